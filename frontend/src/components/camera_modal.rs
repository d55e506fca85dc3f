use super::super::{Model, Msg};
use shared::camera::CloseReason;
use yew::prelude::*;

pub fn render_camera_modal(model: &Model, ctx: &Context<Model>) -> Html {
    if model.camera.is_none() {
        return html! {};
    }

    let link = ctx.link();

    html! {
        <div
            class="camera-backdrop"
            onclick={link.callback(|_| Msg::CloseCamera(CloseReason::BackdropDismissed))}
        >
            <div class="camera-modal" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <video
                    id="camera-video"
                    ref={model.video.clone()}
                    autoplay=true
                    playsinline=true
                    muted=true
                />
                {
                    if let Some(error) = &model.camera_error {
                        html! { <p class="camera-error">{ error }</p> }
                    } else {
                        html! {}
                    }
                }
                <div class="button-container">
                    <button class="analyze-btn" onclick={link.callback(|_| Msg::Capture)}>
                        <i class="fa-solid fa-camera"></i>{" Capture"}
                    </button>
                    <button
                        class="analyze-btn secondary"
                        onclick={link.callback(|_| Msg::CloseCamera(CloseReason::Closed))}
                    >
                        <i class="fa-solid fa-xmark"></i>{" Close"}
                    </button>
                </div>
            </div>
        </div>
    }
}
