//! Frame-sequence display built on [`ImageDisplay`].
//!
//! Each frame update swaps the image data, resets the slider value bounds to
//! the frame's range (handles stay at the colour limits) and re-bins the
//! histogram. Colour limits are
//! re-estimated every `clim_every` updates; intervals that collapse to zero
//! width are ignored so a blank frame does not wreck the display.

use crate::config::DisplayConfig;
use crate::display::{data_bounds, DisplayError, ImageDisplay, Result};
use crate::figsize::guess_video_figsize;
use crate::interval::{estimate, Limits};
use crate::sample::{Sample, SampleKind};
use ndarray::{Array3, ArrayD, Axis, Ix2, Ix3};

/// Parts of the display touched by a frame update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Changed {
    Image,
    SliderRange,
    Histogram,
    Clim,
    Sliders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Stack of frames shown one at a time.
#[derive(Debug, Clone)]
pub struct VideoDisplay {
    frames: Array3<f64>,
    kind: SampleKind,
    display: ImageDisplay,
    frame: usize,
    update_count: usize,
}

impl VideoDisplay {
    /// Display a (frames, rows, cols) array.
    ///
    /// A single 2D image is accepted as a one-frame video.
    pub fn new(data: ArrayD<f64>, config: DisplayConfig) -> Result<Self> {
        let frames = match data.ndim() {
            2 => {
                log::warn!("Loading single image frame as video");
                let image = data
                    .into_dimensionality::<Ix2>()
                    .map_err(|_| DisplayError::VideoDimensionality { ndim: 2 })?;
                image.insert_axis(Axis(0))
            }
            3 => data
                .into_dimensionality::<Ix3>()
                .map_err(|_| DisplayError::VideoDimensionality { ndim: 3 })?,
            ndim => return Err(DisplayError::VideoDimensionality { ndim }),
        };
        Self::from_frames(frames, SampleKind::Float, config)
    }

    /// Display a frame stack whose values came from `kind` data.
    pub fn from_frames(frames: Array3<f64>, kind: SampleKind, config: DisplayConfig) -> Result<Self> {
        if frames.len_of(Axis(0)) == 0 {
            return Err(DisplayError::NoFrames);
        }
        let first = frame_sample(&frames, 0, kind);
        let display = ImageDisplay::from_sample(first, config)?;
        Ok(Self {
            frames,
            kind,
            display,
            frame: 0,
            update_count: 0,
        })
    }

    pub fn display(&self) -> &ImageDisplay {
        &self.display
    }

    /// Mutable access for slider interaction on the current frame.
    pub fn display_mut(&mut self) -> &mut ImageDisplay {
        &mut self.display
    }

    pub fn len(&self) -> usize {
        self.frames.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the frame currently displayed.
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn clim(&self) -> Limits {
        self.display.clim()
    }

    /// Move to frame `i`, wrapping or clamping per the scroll-wrap setting.
    pub fn set_frame(&mut self, i: isize) {
        let n = self.len() as isize;
        let i = if self.display.config().scroll_wrap {
            i.rem_euclid(n)
        } else {
            i.clamp(0, n - 1)
        };
        self.frame = i as usize;
    }

    /// Show frame `i` and return the parts of the display that changed.
    pub fn update(&mut self, i: isize) -> Vec<Changed> {
        self.set_frame(i);
        let sample = frame_sample(&self.frames, self.frame, self.kind);
        let bounds = data_bounds(&sample);
        self.display.set_sample(sample);
        let mut changed = vec![Changed::Image];

        if let Some(sliders) = self.display.sliders_mut() {
            sliders.set_bounds(bounds);
            changed.push(Changed::SliderRange);
        }

        if self.refresh_due() && self.refresh_clim() {
            changed.push(Changed::Clim);
            if self.display.sliders().is_some() {
                changed.push(Changed::Sliders);
            }
        }

        // bins follow the current colour limits
        if self.display.recompute_histogram() {
            changed.push(Changed::Histogram);
        }

        self.update_count += 1;
        changed
    }

    /// Step one frame in `direction`.
    pub fn scroll(&mut self, direction: ScrollDirection) -> Vec<Changed> {
        let step = match direction {
            ScrollDirection::Forward => 1,
            ScrollDirection::Backward => -1,
        };
        self.update(self.frame as isize + step)
    }

    /// Figure size with room for the frame indicator.
    pub fn figsize(&self) -> Result<(f64, f64)> {
        let config = self.display.config();
        Ok(guess_video_figsize(
            self.display.sample().dim(),
            config.screen_inches,
            config.fill_factor,
        )?)
    }

    /// Text for the frame indicator, e.g. "frame 3/10".
    pub fn frame_label(&self) -> String {
        format!("frame {}/{}", self.frame + 1, self.len())
    }

    fn refresh_due(&self) -> bool {
        let every = self.display.config().clim_every;
        every > 0 && self.update_count % every == 0
    }

    /// Re-estimate the colour limits on the current frame.
    ///
    /// Zero-width or fallback limits are logged and ignored.
    fn refresh_clim(&mut self) -> bool {
        let method = self.display.config().interval;
        let result = match estimate(self.display.sample(), &method) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Colour interval estimation failed: {e}. Ignoring");
                return false;
            }
        };

        if result.is_degenerate() {
            log::warn!("Bad colour interval: {}. Ignoring", result.limits);
            return false;
        }

        log::debug!("Auto clims: {}", result.limits);
        self.display.set_clim(result.limits);
        true
    }
}

fn frame_sample(frames: &Array3<f64>, i: usize, kind: SampleKind) -> Sample {
    Sample::new(frames.index_axis(Axis(0), i).to_owned()).with_kind(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Method;
    use ndarray::{Array2, Array3};

    /// Frame `k` holds values k*100 .. k*100 + 99.
    fn stack(n: usize) -> Array3<f64> {
        Array3::from_shape_fn((n, 10, 10), |(k, r, c)| (k * 100 + r * 10 + c) as f64)
    }

    fn config(clim_every: usize, scroll_wrap: bool) -> DisplayConfig {
        DisplayConfig {
            interval: Method::MinMax,
            clim_every,
            scroll_wrap,
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn test_single_image_promoted() {
        let image = Array2::<f64>::from_elem((4, 4), 1.0).into_dyn();
        let video = VideoDisplay::new(image, config(1, true)).unwrap();
        assert_eq!(video.len(), 1);
        assert!(!video.is_empty());
    }

    #[test]
    fn test_bad_dimensionality() {
        let data = ArrayD::<f64>::zeros(ndarray::IxDyn(&[2, 2, 2, 2]));
        assert!(matches!(
            VideoDisplay::new(data, config(1, true)),
            Err(DisplayError::VideoDimensionality { ndim: 4 })
        ));
        assert!(matches!(
            VideoDisplay::from_frames(Array3::zeros((0, 3, 3)), SampleKind::Float, config(1, true)),
            Err(DisplayError::NoFrames)
        ));
    }

    #[test]
    fn test_scroll_wrap_and_clamp() {
        let mut video = VideoDisplay::new(stack(3).into_dyn(), config(1, true)).unwrap();
        video.set_frame(-1);
        assert_eq!(video.frame(), 2);
        video.set_frame(4);
        assert_eq!(video.frame(), 1);

        let mut video = VideoDisplay::new(stack(3).into_dyn(), config(1, false)).unwrap();
        video.set_frame(-1);
        assert_eq!(video.frame(), 0);
        video.set_frame(10);
        assert_eq!(video.frame(), 2);

        video.scroll(ScrollDirection::Forward);
        assert_eq!(video.frame(), 2);
        video.scroll(ScrollDirection::Backward);
        assert_eq!(video.frame(), 1);
        assert_eq!(video.frame_label(), "frame 2/3");
    }

    #[test]
    fn test_update_refreshes_clim_every_frame() {
        let mut video = VideoDisplay::new(stack(3).into_dyn(), config(1, true)).unwrap();
        assert_eq!(video.clim(), Limits::new(0.0, 99.0));

        let changed = video.update(1);
        assert_eq!(
            changed,
            vec![
                Changed::Image,
                Changed::SliderRange,
                Changed::Clim,
                Changed::Sliders,
                Changed::Histogram
            ]
        );
        assert_eq!(video.clim(), Limits::new(100.0, 199.0));
        let sliders = video.display().sliders().unwrap();
        assert_eq!(sliders.bounds(), Limits::new(100.0, 199.0));
        assert_eq!(sliders.positions(), Limits::new(100.0, 199.0));
    }

    #[test]
    fn test_clim_every_cadence() {
        let mut video = VideoDisplay::new(stack(4).into_dyn(), config(2, true)).unwrap();

        // updates 0 and 2 refresh, 1 and 3 keep the previous limits
        video.update(1);
        assert_eq!(video.clim(), Limits::new(100.0, 199.0));
        let changed = video.update(2);
        assert!(!changed.contains(&Changed::Clim));
        assert_eq!(video.clim(), Limits::new(100.0, 199.0));
        video.update(3);
        assert_eq!(video.clim(), Limits::new(300.0, 399.0));
    }

    #[test]
    fn test_clim_every_zero_never_refreshes() {
        let mut video = VideoDisplay::new(stack(3).into_dyn(), config(0, true)).unwrap();
        for i in 0..5 {
            let changed = video.update(i);
            assert!(!changed.contains(&Changed::Clim));
        }
        assert_eq!(video.clim(), Limits::new(0.0, 99.0));
    }

    #[test]
    fn test_sliders_follow_clim_without_refresh() {
        let mut frames = stack(2);
        frames
            .index_axis_mut(Axis(0), 1)
            .assign(&Array2::from_shape_fn((10, 10), |(_, c)| (40 + c) as f64));
        let mut video =
            VideoDisplay::from_frames(frames, SampleKind::Float, config(0, true)).unwrap();

        let changed = video.update(1);
        assert!(changed.contains(&Changed::SliderRange));
        assert_eq!(video.clim(), Limits::new(0.0, 99.0));
        let sliders = video.display().sliders().unwrap();
        assert_eq!(sliders.bounds(), Limits::new(40.0, 49.0));
        assert_eq!(sliders.positions(), video.clim());
    }

    #[test]
    fn test_flat_frame_interval_ignored() {
        let mut frames = stack(2);
        frames.index_axis_mut(Axis(0), 1).fill(7.0);
        let mut video =
            VideoDisplay::from_frames(frames, SampleKind::Float, config(1, true)).unwrap();

        let changed = video.update(1);
        assert!(!changed.contains(&Changed::Clim));
        assert_eq!(video.clim(), Limits::new(0.0, 99.0));
        let sliders = video.display().sliders().unwrap();
        assert_eq!(sliders.bounds(), Limits::new(7.0, 7.0));
        assert_eq!(sliders.positions(), video.clim());
    }

    #[test]
    fn test_no_sliders_or_histogram() {
        let config = DisplayConfig {
            show_sliders: false,
            show_histogram: false,
            ..config(1, true)
        };
        let mut video = VideoDisplay::new(stack(2).into_dyn(), config).unwrap();
        assert_eq!(video.update(1), vec![Changed::Image, Changed::Clim]);
    }

    #[test]
    fn test_video_figsize_taller_than_image() {
        let video = VideoDisplay::new(stack(2).into_dyn(), config(1, true)).unwrap();
        let (w, h) = video.figsize().unwrap();
        assert!(h > w);
    }
}
