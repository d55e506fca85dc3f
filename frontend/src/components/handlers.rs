use super::super::{Model, Msg};
use crate::{api, camera};
use gloo_file::{Blob, File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use js_sys::Date;
use shared::camera::{CameraSession, CloseReason};
use shared::flow::{SelectedImage, ViewState};
use shared::report::{render_report, report_file_name};
use shared::upload::validate_upload;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, HtmlAnchorElement};
use yew::prelude::*;

/// Checks type and size before reading the file, then loads its bytes.
pub fn handle_file_chosen(ctx: &Context<Model>, file: web_sys::File) -> bool {
    let file = GlooFile::from(file);
    let mime_type = file.raw_mime_type();

    if let Err(err) = validate_upload(&mime_type, file.size() as usize) {
        log::warn!("Rejected {}: {}", file.name(), err);
        ctx.link().send_message(Msg::SelectionFailed(err.to_string()));
        return false;
    }

    let link = ctx.link().clone();
    spawn_local(async move {
        match gloo_file::futures::read_as_bytes(&file).await {
            Ok(bytes) => {
                link.send_message(Msg::FileLoaded(SelectedImage::new(file.name(), mime_type, bytes)))
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", file.name(), e);
                link.send_message(Msg::SelectionFailed("Failed to read the selected file.".into()))
            }
        }
    });

    false
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if model.flow.state() != ViewState::Upload {
        return true;
    }

    if let Some(file) = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|files| files.item(0))
    {
        handle_file_chosen(ctx, file);
    }

    true
}

pub fn send_analysis_request(ctx: &Context<Model>, image: SelectedImage) {
    spawn_local({
        let link = ctx.link().clone();

        async move {
            log::info!("Sending {} ({} bytes) for analysis", image.name, image.size());
            let result = api::analyze_image(&image).await;
            link.send_message(Msg::AnalysisFinished(result));
        }
    });
}

pub fn handle_download_report(model: &Model) -> bool {
    let Some(result) = model.flow.result() else {
        return false;
    };

    let generated_at: String = Date::new_0()
        .to_locale_string("en-US", &JsValue::UNDEFINED)
        .into();
    let report = render_report(result, &generated_at);

    if let Err(e) = trigger_download(&report_file_name(Date::now() as u64), &report) {
        log::error!("Report download failed: {:?}", e);
    }
    false
}

fn trigger_download(file_name: &str, contents: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;

    let url = ObjectUrl::from(Blob::new_with_options(contents, Some("text/plain")));
    let anchor = document.create_element("a")?.dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    // Revoke after the click has been handled.
    Timeout::new(0, move || drop(url)).forget();
    Ok(())
}

pub fn handle_open_camera(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.camera.is_some() || model.flow.state() != ViewState::Upload {
        return false;
    }
    model.camera_error = None;

    let link = ctx.link().clone();
    spawn_local(async move {
        match camera::acquire().await {
            Ok(stream) => link.send_message(Msg::CameraReady(stream)),
            Err(message) => link.send_message(Msg::CameraFailed(message)),
        }
    });

    true
}

pub fn handle_camera_ready(model: &mut Model, stream: camera::LiveStream) -> bool {
    let session = CameraSession::open(stream);

    // A second stream or one that arrives after leaving the upload view is
    // released when `session` drops.
    if model.camera.is_some() || model.flow.state() != ViewState::Upload {
        return false;
    }

    model.camera = Some(session);
    true
}

pub fn handle_capture(model: &mut Model, ctx: &Context<Model>) -> bool {
    match camera::capture_frame(&model.video) {
        Ok(image) => {
            close_camera(model, CloseReason::Captured);
            ctx.link().send_message(Msg::FileLoaded(image));
        }
        Err(message) => {
            log::warn!("Capture failed: {}", message);
            model.camera_error = Some(message);
        }
    }
    true
}

pub fn close_camera(model: &mut Model, reason: CloseReason) -> bool {
    match model.camera.take() {
        Some(mut session) => {
            let reason = session.close(reason);
            log::info!("Camera view closed ({:?})", reason);
            model.camera_error = None;
            true
        }
        None => false,
    }
}
