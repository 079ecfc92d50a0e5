//! Aspect-fit for the video render surface

use theater_core::Resolution;

/// Local scale applied to the screen fitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitScale {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl FitScale {
    pub const ONE: FitScale = FitScale {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };
}

impl Default for FitScale {
    fn default() -> Self {
        Self::ONE
    }
}

/// Scale that fits media of `video_aspect` into a container of
/// `container_aspect` without distortion
///
/// Wider media keeps the container width and shrinks height; taller media
/// keeps the height and shrinks width.
pub fn aspect_fit(video_aspect: f32, container_aspect: f32) -> FitScale {
    if video_aspect > container_aspect {
        FitScale {
            x: 1.0,
            y: container_aspect / video_aspect,
            z: 1.0,
        }
    } else {
        FitScale {
            x: video_aspect / container_aspect,
            y: 1.0,
            z: 1.0,
        }
    }
}

/// Container the render targets sit in
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenFitter {
    size: (f32, f32),
    current: FitScale,
    initial: Option<FitScale>,
}

impl ScreenFitter {
    pub fn new(size: (f32, f32)) -> Self {
        Self {
            size,
            current: FitScale::ONE,
            initial: None,
        }
    }

    /// Container aspect, `None` when the container has no area
    pub fn aspect(&self) -> Option<f32> {
        let (width, height) = self.size;
        (width > 0.0 && height > 0.0).then(|| width / height)
    }

    pub fn set_size(&mut self, size: (f32, f32)) {
        self.size = size;
    }

    /// Fit media of `resolution`; `None` if either side is degenerate
    pub fn fit(&mut self, resolution: Resolution) -> Option<FitScale> {
        let video = resolution.aspect()?;
        let container = self.aspect()?;

        self.initial.get_or_insert(self.current);
        self.current = aspect_fit(video, container);
        Some(self.current)
    }

    /// Scale before the first fit
    pub fn reset(&mut self) -> FitScale {
        self.current = self.initial.unwrap_or(FitScale::ONE);
        self.current
    }

    pub fn current(&self) -> FitScale {
        self.current
    }
}
