//! Band assessment pipeline.
//!
//! A run advances `Loaded -> Windowed -> CircleDetected -> ProfileComputed -> Ready`.
//! Any fatal condition moves it to `Failed` and it stays there. Only a `Ready`
//! pipeline produces a [`BandReport`].

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::AssessmentConfig;
use crate::error::AssessmentError;
use crate::grid::Image;
use crate::locate::{locate_circle, CircleDetection};
use crate::rings::{integrate_rings, RadialProfile};
use crate::smooth::{smooth_profile, SmoothedProfile};
use crate::window::{apply_window, WindowedImage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Loaded,
    Windowed,
    CircleDetected,
    ProfileComputed,
    Ready,
    Failed(AssessmentError),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Loaded => "loaded",
            PipelineState::Windowed => "windowed",
            PipelineState::CircleDetected => "circle-detected",
            PipelineState::ProfileComputed => "profile-computed",
            PipelineState::Ready => "ready",
            PipelineState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Ready | PipelineState::Failed(_))
    }
}

/// Final artifact of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct BandReport {
    pub detection: CircleDetection,
    pub profile: Vec<f64>,
    pub smoothed: Vec<f64>,
    /// The windowed image was flat; the display copy is all zeros
    pub degenerate_window: bool,
}

impl BandReport {
    pub fn is_abnormal(&self) -> bool {
        self.detection.quality.is_abnormal()
    }
}

/// Intermediates owned by each non-terminal stage. A failed run keeps none.
enum Stage {
    Loaded,
    Windowed(WindowedImage),
    CircleDetected(WindowedImage, CircleDetection),
    ProfileComputed(WindowedImage, CircleDetection, RadialProfile),
    Ready(WindowedImage, BandReport),
}

impl Stage {
    fn state(&self) -> PipelineState {
        match self {
            Stage::Loaded => PipelineState::Loaded,
            Stage::Windowed(..) => PipelineState::Windowed,
            Stage::CircleDetected(..) => PipelineState::CircleDetected,
            Stage::ProfileComputed(..) => PipelineState::ProfileComputed,
            Stage::Ready(..) => PipelineState::Ready,
        }
    }

    fn windowed(&self) -> Option<&WindowedImage> {
        match self {
            Stage::Loaded => None,
            Stage::Windowed(w)
            | Stage::CircleDetected(w, _)
            | Stage::ProfileComputed(w, _, _)
            | Stage::Ready(w, _) => Some(w),
        }
    }
}

/// One assessment over a single image. Owns every intermediate grid it derives.
pub struct Pipeline<'a> {
    image: &'a Image,
    config: AssessmentConfig,
    state: PipelineState,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    pub fn new(image: &'a Image, config: AssessmentConfig) -> Self {
        Self {
            image,
            config,
            state: PipelineState::Loaded,
            stage: Stage::Loaded,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == PipelineState::Ready
    }

    pub fn windowed(&self) -> Option<&WindowedImage> {
        self.stage.windowed()
    }

    pub fn detection(&self) -> Option<&CircleDetection> {
        match &self.stage {
            Stage::CircleDetected(_, d) | Stage::ProfileComputed(_, d, _) => Some(d),
            Stage::Ready(_, report) => Some(&report.detection),
            Stage::Loaded | Stage::Windowed(_) => None,
        }
    }

    /// Advance one stage. Terminal states are left unchanged.
    pub fn step(&mut self) -> &PipelineState {
        if self.state.is_terminal() {
            return &self.state;
        }
        let stage = std::mem::replace(&mut self.stage, Stage::Loaded);
        let next = match self.advance(stage) {
            Ok(stage) => {
                self.stage = stage;
                self.stage.state()
            }
            Err(err) => {
                error!("Assessment aborted in state {}: {}", self.state.name(), err);
                PipelineState::Failed(err)
            }
        };
        debug!("Pipeline {} -> {}", self.state.name(), next.name());
        self.state = next;
        &self.state
    }

    fn advance(&self, stage: Stage) -> Result<Stage, AssessmentError> {
        let next = match stage {
            Stage::Loaded => Stage::Windowed(apply_window(&self.image.pixels, &self.config.window)),
            Stage::Windowed(windowed) => {
                let detection =
                    locate_circle(&windowed.clipped, self.image.spacing, &self.config);
                info!(
                    "Phantom center ({}, {}), radius {}",
                    detection.circle.center_row,
                    detection.circle.center_col,
                    detection.circle.radius
                );
                Stage::CircleDetected(windowed, detection)
            }
            Stage::CircleDetected(windowed, detection) => {
                let profile = integrate_rings(&windowed.clipped, &detection.circle)?;
                Stage::ProfileComputed(windowed, detection, profile)
            }
            Stage::ProfileComputed(windowed, detection, profile) => {
                let smoothed: SmoothedProfile =
                    smooth_profile(&profile, self.config.smoothing_factor)?;
                let report = BandReport {
                    detection,
                    profile: profile.0,
                    smoothed: smoothed.0,
                    degenerate_window: windowed.degenerate,
                };
                Stage::Ready(windowed, report)
            }
            ready @ Stage::Ready(..) => ready,
        };
        Ok(next)
    }

    /// Step until the pipeline reaches `Ready` or `Failed`.
    pub fn run(mut self) -> Self {
        while !self.state.is_terminal() {
            self.step();
        }
        self
    }

    /// The finished report; `None` unless the pipeline is `Ready`.
    pub fn report(&self) -> Option<BandReport> {
        match &self.stage {
            Stage::Ready(_, report) => Some(report.clone()),
            _ => None,
        }
    }

    /// Consume a finished pipeline into its report or the error that stopped it.
    pub fn finish(self) -> Result<(BandReport, WindowedImage), AssessmentError> {
        let pipeline = self.run();
        match (pipeline.state, pipeline.stage) {
            (PipelineState::Failed(err), _) => Err(err),
            (_, Stage::Ready(windowed, report)) => Ok((report, windowed)),
            (state, _) => unreachable!("run() stopped in non-terminal state {}", state.name()),
        }
    }
}

/// Run the whole pipeline over `image`.
pub fn assess(image: &Image, config: &AssessmentConfig) -> Result<BandReport, AssessmentError> {
    Pipeline::new(image, config.clone())
        .finish()
        .map(|(report, _)| report)
}
