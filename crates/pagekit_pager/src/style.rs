//! Page style interpolation
//!
//! For every page, on every display position change, the pager computes
//! `page_offset = page_index - scroll_position` and asks the style
//! interpolator for a transform. Interpolators are pure projections.

use serde::Serialize;

/// Input to a page style interpolator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageStyleParams {
    /// Pages between this page and the display position (positive = ahead)
    pub page_offset: f32,
    pub page_index: usize,
    pub page_size: f32,
    /// Display scroll position, in pages
    pub scroll_position: f32,
}

/// Visual transform applied to a page on top of the track translation
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PageTransform {
    /// Extra translation along the scroll axis
    pub translate: f32,
    pub scale: f32,
    pub opacity: f32,
    pub z_index: i32,
}

impl PageTransform {
    pub const IDENTITY: PageTransform = PageTransform {
        translate: 0.0,
        scale: 1.0,
        opacity: 1.0,
        z_index: 0,
    };
}

impl Default for PageTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Computes a page's transform from its offset to the display position
pub trait PageStyleInterpolator: Send {
    fn style(&self, params: &PageStyleParams) -> PageTransform;
}

/// Default: plain sliding pages
#[derive(Clone, Copy, Debug, Default)]
pub struct SlideStyle;

impl PageStyleInterpolator for SlideStyle {
    fn style(&self, _params: &PageStyleParams) -> PageTransform {
        PageTransform::IDENTITY
    }
}

/// Pages ahead of the display position stack up behind the active one,
/// shrinking slightly and fading out two pages deep; passed pages fade away.
#[derive(Clone, Copy, Debug)]
pub struct CardStackStyle {
    /// Visible sliver of each stacked card
    pub peek: f32,
}

impl Default for CardStackStyle {
    fn default() -> Self {
        Self { peek: 16.0 }
    }
}

impl PageStyleInterpolator for CardStackStyle {
    fn style(&self, params: &PageStyleParams) -> PageTransform {
        let z_index = 100 - params.page_index as i32;

        if params.page_offset >= 0.0 {
            let index = params.page_index as f32;
            // Cancel the track translation so stacked cards stay put
            let translate = index * -params.page_size
                + self.peek * (index - params.scroll_position)
                + params.scroll_position * params.page_size;
            PageTransform {
                translate,
                scale: interpolate(params.page_offset, &[0.0, 1.0], &[1.0, 0.965], Extrapolate::Extend),
                opacity: interpolate(
                    params.page_offset,
                    &[0.0, 1.5, 2.0],
                    &[1.0, 1.0, 0.3],
                    Extrapolate::Extend,
                ),
                z_index,
            }
        } else {
            PageTransform {
                opacity: interpolate(params.page_offset, &[-1.0, 0.0], &[0.0, 1.0], Extrapolate::Extend),
                z_index,
                ..PageTransform::IDENTITY
            }
        }
    }
}

/// Behavior outside the input range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Extrapolate {
    /// Continue the edge segment's slope
    #[default]
    Extend,
    /// Hold the edge output
    Clamp,
    /// Return the input unchanged
    Identity,
}

/// Piecewise-linear mapping of `value` from `input` breakpoints to `output`
///
/// `input` must be ascending and the same length as `output` (at least two
/// points); otherwise `value` is returned unchanged.
pub fn interpolate(value: f32, input: &[f32], output: &[f32], extrapolate: Extrapolate) -> f32 {
    if input.len() < 2 || input.len() != output.len() {
        tracing::warn!(
            inputs = input.len(),
            outputs = output.len(),
            "interpolate called with mismatched ranges"
        );
        return value;
    }

    let last = input.len() - 1;
    let outside = value < input[0] || value > input[last];
    if outside {
        match extrapolate {
            Extrapolate::Identity => return value,
            Extrapolate::Clamp => {
                return if value < input[0] {
                    output[0]
                } else {
                    output[last]
                };
            }
            Extrapolate::Extend => {}
        }
    }

    // Segment containing value (edge segments extend outward)
    let segment = input
        .windows(2)
        .position(|w| value <= w[1])
        .unwrap_or(last - 1);
    let (x0, x1) = (input[segment], input[segment + 1]);
    let (y0, y1) = (output[segment], output[segment + 1]);

    if x1 == x0 {
        return y0;
    }
    y0 + (value - x0) / (x1 - x0) * (y1 - y0)
}
