//! Client view-state machine.
//!
//! The browser page is always in exactly one [`View`]. Each view owns the data
//! it needs, so a result can only exist while the results view is shown and a
//! pending request only while loading. [`Flow::apply`] is the single place
//! where views change.

use derive_more::Display;

use crate::AnalysisResponse;
use crate::data_url::encode_data_url;
use crate::upload::validate_upload;

pub const GENERIC_ANALYSIS_ERROR: &str = "Failed to analyze image. Please try again.";

/// An image picked from disk, dropped on the page or captured from the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn preview_url(&self) -> String {
        encode_data_url(&self.mime_type, &self.bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ViewState {
    #[display(fmt = "upload")]
    Upload,
    #[display(fmt = "preview")]
    Preview,
    #[display(fmt = "loading")]
    Loading,
    #[display(fmt = "results")]
    Results,
    #[display(fmt = "error")]
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Upload,
    Preview {
        image: SelectedImage,
    },
    Loading {
        image: SelectedImage,
    },
    Results {
        image: SelectedImage,
        result: AnalysisResponse,
    },
    Error {
        message: String,
    },
}

impl View {
    pub fn state(&self) -> ViewState {
        match self {
            View::Upload => ViewState::Upload,
            View::Preview { .. } => ViewState::Preview,
            View::Loading { .. } => ViewState::Loading,
            View::Results { .. } => ViewState::Results,
            View::Error { .. } => ViewState::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FlowEvent {
    ImageSelected(SelectedImage),
    /// The browser could not produce an image (unreadable file, camera denied).
    SelectionFailed(String),
    AnalyzeRequested,
    AnalysisSucceeded(AnalysisResponse),
    /// Network failure or non-success response, with the server message if any.
    AnalysisFailed(Option<String>),
    Reset,
}

impl FlowEvent {
    fn name(&self) -> &'static str {
        match self {
            FlowEvent::ImageSelected(_) => "image-selected",
            FlowEvent::SelectionFailed(_) => "selection-failed",
            FlowEvent::AnalyzeRequested => "analyze-requested",
            FlowEvent::AnalysisSucceeded(_) => "analysis-succeeded",
            FlowEvent::AnalysisFailed(_) => "analysis-failed",
            FlowEvent::Reset => "reset",
        }
    }
}

/// Work the UI must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SendRequest(SelectedImage),
    ClearFileInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FlowError {
    #[display(fmt = "event '{}' is not allowed in the {} view", event, from)]
    IllegalTransition { from: ViewState, event: &'static str },
}

impl std::error::Error for FlowError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    view: View,
}

impl Default for Flow {
    fn default() -> Self {
        Self { view: View::Upload }
    }
}

impl Flow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn state(&self) -> ViewState {
        self.view.state()
    }

    pub fn result(&self) -> Option<&AnalysisResponse> {
        match &self.view {
            View::Results { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn selected_image(&self) -> Option<&SelectedImage> {
        match &self.view {
            View::Preview { image } | View::Loading { image } | View::Results { image, .. } => {
                Some(image)
            }
            _ => None,
        }
    }

    pub fn can_analyze(&self) -> bool {
        matches!(self.view, View::Preview { .. })
    }

    /// Applies `event`. An illegal event leaves the current view untouched.
    pub fn apply(&mut self, event: FlowEvent) -> Result<Effect, FlowError> {
        let current = std::mem::replace(&mut self.view, View::Upload);
        match transition(current, event) {
            Ok((next, effect)) => {
                self.view = next;
                Ok(effect)
            }
            Err((current, err)) => {
                self.view = current;
                Err(err)
            }
        }
    }
}

type Transition = Result<(View, Effect), (View, FlowError)>;

fn transition(view: View, event: FlowEvent) -> Transition {
    match (view, event) {
        (View::Upload, FlowEvent::ImageSelected(image)) => {
            match validate_upload(&image.mime_type, image.size()) {
                Ok(()) => Ok((View::Preview { image }, Effect::None)),
                Err(err) => Ok((
                    View::Error {
                        message: err.to_string(),
                    },
                    Effect::ClearFileInput,
                )),
            }
        }
        (View::Upload, FlowEvent::SelectionFailed(message)) => {
            Ok((View::Error { message }, Effect::ClearFileInput))
        }
        (View::Preview { image }, FlowEvent::AnalyzeRequested) => Ok((
            View::Loading {
                image: image.clone(),
            },
            Effect::SendRequest(image),
        )),
        (View::Loading { image }, FlowEvent::AnalysisSucceeded(result)) => {
            Ok((View::Results { image, result }, Effect::None))
        }
        (View::Loading { .. }, FlowEvent::AnalysisFailed(message)) => {
            let message = message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_ANALYSIS_ERROR.to_string());
            Ok((View::Error { message }, Effect::None))
        }
        (View::Results { .. } | View::Error { .. }, FlowEvent::Reset) => {
            Ok((View::Upload, Effect::ClearFileInput))
        }
        (view, event) => {
            let err = FlowError::IllegalTransition {
                from: view.state(),
                event: event.name(),
            };
            Err((view, err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::MAX_UPLOAD_BYTES;
    use crate::{ConditionLabel, Distribution, RecommendationBody};

    fn jpeg(size: usize) -> SelectedImage {
        SelectedImage::new("face.jpg", "image/jpeg", vec![0u8; size])
    }

    fn response() -> AnalysisResponse {
        AnalysisResponse {
            success: true,
            top_condition: ConditionLabel::Acne,
            confidence: 91.2,
            all_conditions: Distribution::from_fn(|l| {
                if l == ConditionLabel::Acne { 91.23 } else { 1.75 }
            }),
            recommendations: RecommendationBody {
                description: "d".into(),
                tips: vec!["t".into()],
                ingredients_to_look_for: vec!["a".into()],
                ingredients_to_avoid: vec!["b".into()],
            },
        }
    }

    fn flow_with_result() -> Flow {
        let mut flow = Flow::new();
        flow.apply(FlowEvent::ImageSelected(jpeg(64))).unwrap();
        flow.apply(FlowEvent::AnalyzeRequested).unwrap();
        flow.apply(FlowEvent::AnalysisSucceeded(response())).unwrap();
        flow
    }

    #[test]
    fn happy_path_reaches_results() {
        let mut flow = Flow::new();
        assert_eq!(flow.state(), ViewState::Upload);

        assert_eq!(flow.apply(FlowEvent::ImageSelected(jpeg(64))), Ok(Effect::None));
        assert_eq!(flow.state(), ViewState::Preview);
        assert!(flow.can_analyze());

        let effect = flow.apply(FlowEvent::AnalyzeRequested).unwrap();
        assert_eq!(effect, Effect::SendRequest(jpeg(64)));
        assert_eq!(flow.state(), ViewState::Loading);

        flow.apply(FlowEvent::AnalysisSucceeded(response())).unwrap();
        assert_eq!(flow.state(), ViewState::Results);
        assert_eq!(flow.result(), Some(&response()));
    }

    #[test]
    fn oversized_file_is_rejected_without_a_request() {
        let mut flow = Flow::new();
        let effect = flow.apply(FlowEvent::ImageSelected(jpeg(MAX_UPLOAD_BYTES + 1))).unwrap();
        assert_eq!(effect, Effect::ClearFileInput);
        assert_eq!(
            flow.view(),
            &View::Error {
                message: "File size must be less than 10MB.".into()
            }
        );
        assert!(flow.apply(FlowEvent::AnalyzeRequested).is_err());
    }

    #[test]
    fn non_image_file_goes_to_error() {
        let mut flow = Flow::new();
        let text = SelectedImage::new("notes.txt", "text/plain", b"hello".to_vec());
        flow.apply(FlowEvent::ImageSelected(text)).unwrap();
        assert_eq!(flow.state(), ViewState::Error);
    }

    #[test]
    fn only_one_request_in_flight() {
        let mut flow = Flow::new();
        flow.apply(FlowEvent::ImageSelected(jpeg(8))).unwrap();
        flow.apply(FlowEvent::AnalyzeRequested).unwrap();

        let err = flow.apply(FlowEvent::AnalyzeRequested).unwrap_err();
        assert_eq!(
            err,
            FlowError::IllegalTransition {
                from: ViewState::Loading,
                event: "analyze-requested"
            }
        );
        assert_eq!(flow.state(), ViewState::Loading);
        assert!(!flow.can_analyze());
    }

    #[test]
    fn failure_uses_server_message_or_fallback() {
        let mut flow = Flow::new();
        flow.apply(FlowEvent::ImageSelected(jpeg(8))).unwrap();
        flow.apply(FlowEvent::AnalyzeRequested).unwrap();
        flow.apply(FlowEvent::AnalysisFailed(Some("No skin detected in the image".into())))
            .unwrap();
        assert_eq!(
            flow.view(),
            &View::Error {
                message: "No skin detected in the image".into()
            }
        );

        flow.apply(FlowEvent::Reset).unwrap();
        flow.apply(FlowEvent::ImageSelected(jpeg(8))).unwrap();
        flow.apply(FlowEvent::AnalyzeRequested).unwrap();
        flow.apply(FlowEvent::AnalysisFailed(None)).unwrap();
        assert_eq!(
            flow.view(),
            &View::Error {
                message: GENERIC_ANALYSIS_ERROR.into()
            }
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut flow = flow_with_result();
        assert_eq!(flow.apply(FlowEvent::Reset), Ok(Effect::ClearFileInput));
        assert_eq!(flow, Flow::new());
        assert!(flow.result().is_none());
        assert!(flow.selected_image().is_none());
    }

    #[test]
    fn reset_is_only_offered_from_terminal_views() {
        let mut flow = Flow::new();
        flow.apply(FlowEvent::ImageSelected(jpeg(8))).unwrap();
        assert!(flow.apply(FlowEvent::Reset).is_err());
        assert_eq!(flow.state(), ViewState::Preview);
    }

    #[test]
    fn results_view_ignores_late_responses() {
        let mut flow = flow_with_result();
        assert!(flow.apply(FlowEvent::AnalysisFailed(None)).is_err());
        assert_eq!(flow.state(), ViewState::Results);
    }
}
