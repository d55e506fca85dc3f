mod api;
mod camera;
mod components;

use camera::LiveStream;
use components::handlers;
use components::{camera_modal, header, preview_area, results, upload_section, utils};
use gloo_events::EventListener;
use shared::camera::{CameraSession, CloseReason};
use shared::flow::{Effect, Flow, FlowEvent, SelectedImage, View};
use shared::AnalysisResponse;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, KeyboardEvent};
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // Selection
    FileChosen(web_sys::File),
    FileLoaded(SelectedImage),
    SelectionFailed(String),
    SetDragging(bool),
    HandleDrop(DragEvent),

    // Analysis
    Analyze,
    AnalysisFinished(Result<AnalysisResponse, Option<String>>),
    Reset,
    DownloadReport,

    // Camera
    OpenCamera,
    CameraReady(LiveStream),
    CameraFailed(String),
    Capture,
    CloseCamera(CloseReason),
}

// Main component
pub struct Model {
    pub flow: Flow,
    pub is_dragging: bool,
    pub camera: Option<CameraSession<LiveStream>>,
    pub camera_error: Option<String>,
    pub file_input: NodeRef,
    pub video: NodeRef,
    key_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            flow: Flow::new(),
            is_dragging: false,
            camera: None,
            camera_error: None,
            file_input: NodeRef::default(),
            video: NodeRef::default(),
            key_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "keydown", move |event| {
                if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
                    if key_event.key() == "Escape" {
                        link.send_message(Msg::CloseCamera(CloseReason::Closed));
                    }
                }
            });
            model.key_listener = Some(listener);
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => handlers::handle_file_chosen(ctx, file),
            Msg::FileLoaded(image) => self.dispatch(ctx, FlowEvent::ImageSelected(image)),
            Msg::SelectionFailed(message) => {
                self.dispatch(ctx, FlowEvent::SelectionFailed(message))
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),

            Msg::Analyze => self.dispatch(ctx, FlowEvent::AnalyzeRequested),
            Msg::AnalysisFinished(Ok(result)) => {
                self.dispatch(ctx, FlowEvent::AnalysisSucceeded(result))
            }
            Msg::AnalysisFinished(Err(message)) => {
                self.dispatch(ctx, FlowEvent::AnalysisFailed(message))
            }
            Msg::Reset => self.dispatch(ctx, FlowEvent::Reset),
            Msg::DownloadReport => handlers::handle_download_report(self),

            Msg::OpenCamera => handlers::handle_open_camera(self, ctx),
            Msg::CameraReady(stream) => handlers::handle_camera_ready(self, stream),
            Msg::CameraFailed(message) => {
                log::warn!("Camera unavailable: {}", message);
                self.camera_error = Some(message);
                true
            }
            Msg::Capture => handlers::handle_capture(self, ctx),
            Msg::CloseCamera(reason) => handlers::close_camera(self, reason),
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        camera::attach_stream(&self.video, self.camera.as_ref());
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let body = match self.flow.view() {
            View::Upload => upload_section::render_upload_section(self, ctx),
            View::Preview { image } => preview_area::render_preview_area(image, ctx, false),
            View::Loading { image } => preview_area::render_preview_area(image, ctx, true),
            View::Results { image, result } => results::render_results(image, result, ctx),
            View::Error { message } => utils::render_error_message(message, ctx),
        };

        html! {
            <div class="container">
                { header::render_header() }
                { upload_section::render_file_input(self, ctx) }

                <main class="main-content">
                    { body }
                </main>

                { camera_modal::render_camera_modal(self, ctx) }

                <footer class="app-footer">
                    <p>{"This tool is for informational purposes only and is not a substitute for professional medical advice."}</p>
                </footer>
            </div>
        }
    }
}

impl Model {
    /// Feeds one event through the view state machine and performs the
    /// effect it asks for.
    fn dispatch(&mut self, ctx: &Context<Self>, event: FlowEvent) -> bool {
        match self.flow.apply(event) {
            Ok(Effect::None) => true,
            Ok(Effect::SendRequest(image)) => {
                handlers::send_analysis_request(ctx, image);
                true
            }
            Ok(Effect::ClearFileInput) => {
                utils::clear_file_input(&self.file_input);
                true
            }
            Err(err) => {
                log::warn!("Ignored UI event: {}", err);
                false
            }
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
