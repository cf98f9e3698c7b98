//! Scroll progress as a percentage of the scrollable distance.

/// Percentage of the page scrolled, in `0.0..=100.0`.
///
/// Returns 0 when the document fits in the viewport and cannot scroll.
///
/// # Example
/// ```
/// use call_pacer::scroll_progress;
///
/// assert_eq!(scroll_progress(500.0, 2_000.0, 1_000.0), 50.0);
/// assert_eq!(scroll_progress(0.0, 800.0, 1_000.0), 0.0);
/// ```
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if !scrollable.is_finite() || scrollable <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}
