use js_sys::Date;
use shared::camera::{capture_file_name, CameraSession, MediaSource, CAPTURE_MIME, CAPTURE_QUALITY};
use shared::data_url::decode_data_url;
use shared::flow::SelectedImage;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use yew::NodeRef;

/// Browser media stream owned by an open camera view.
pub struct LiveStream(MediaStream);

impl MediaSource for LiveStream {
    fn stop_all_tracks(&self) {
        for track in self.0.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        log::info!("Camera stream released");
    }
}

fn js_error(context: &str, err: JsValue) -> String {
    format!("{}: {:?}", context, err)
}

/// Asks the browser for a video stream.
pub async fn acquire() -> Result<LiveStream, String> {
    let window = web_sys::window().ok_or("No window available")?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| js_error("Camera is not supported in this browser", e))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| js_error("Unable to access camera", e))?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(|e| js_error("Unable to access camera", e))?
        .dyn_into::<MediaStream>()
        .map_err(|e| js_error("Unexpected camera stream", e))?;

    Ok(LiveStream(stream))
}

/// Points the live preview `<video>` at the open session's stream.
pub fn attach_stream(video: &NodeRef, session: Option<&CameraSession<LiveStream>>) {
    let (Some(video), Some(LiveStream(stream))) = (
        video.cast::<HtmlVideoElement>(),
        session.and_then(|s| s.stream()),
    ) else {
        return;
    };

    let current = video.src_object().map(|s| s.id());
    if current.as_deref() != Some(stream.id().as_str()) {
        video.set_src_object(Some(stream));
    }
}

/// Draws the current video frame to an offscreen canvas and encodes it as JPEG.
pub fn capture_frame(video: &NodeRef) -> Result<SelectedImage, String> {
    let video = video
        .cast::<HtmlVideoElement>()
        .ok_or("Camera preview is not available")?;
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return Err("Camera is not ready yet".to_string());
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document available")?;
    let canvas = document
        .create_element("canvas")
        .map_err(|e| js_error("Unable to create canvas", e))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| "Unable to create canvas".to_string())?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context = canvas
        .get_context("2d")
        .map_err(|e| js_error("Unable to draw frame", e))?
        .ok_or("Canvas 2D context unavailable")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "Canvas 2D context unavailable".to_string())?;
    context
        .draw_image_with_html_video_element(&video, 0.0, 0.0)
        .map_err(|e| js_error("Unable to draw frame", e))?;

    let data_url = canvas
        .to_data_url_with_type_and_encoder_options(CAPTURE_MIME, &JsValue::from_f64(CAPTURE_QUALITY))
        .map_err(|e| js_error("Unable to encode frame", e))?;
    let decoded = decode_data_url(&data_url).map_err(|e| e.to_string())?;

    Ok(SelectedImage::new(
        capture_file_name(Date::now() as u64),
        decoded.mime_type.unwrap_or_else(|| CAPTURE_MIME.to_string()),
        decoded.bytes,
    ))
}
