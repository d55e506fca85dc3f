use super::super::Model;
use super::super::Msg;
use super::utils::debounce;
use shared::upload::MAX_UPLOAD_BYTES;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

/// Hidden picker. Rendered in every view so a reset can always clear it.
pub fn render_file_input(model: &Model, ctx: &Context<Model>) -> Html {
    let handle_change = ctx.link().batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.files().and_then(|files| files.item(0)).map(Msg::FileChosen)
    });

    html! {
        <input
            type="file"
            id="file-input"
            ref={model.file_input.clone()}
            accept="image/*"
            style="display: none;"
            onchange={handle_change}
        />
    }
}

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = {
        let file_input = model.file_input.clone();
        Callback::from(move |_| {
            if let Some(input) = file_input.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    html! {
        <div class="upload-section">
            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop a photo here, or click to browse"}</p>
                    <p class="file-types">
                        { format!("Supported formats: JPG, PNG, WEBP (max {}MB)", MAX_UPLOAD_BYTES / (1024 * 1024)) }
                    </p>
                </div>
            </div>

            <div class="button-container">
                <button
                    id="upload-button"
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let trigger_file_input = trigger_file_input.clone();
                        move || trigger_file_input.emit(())
                    })}
                >
                    <i class="fa-solid fa-upload"></i> {" Choose Photo"}
                </button>
                <button
                    id="camera-button"
                    class="analyze-btn secondary"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::OpenCamera)
                    })}
                >
                    <i class="fa-solid fa-camera"></i> {" Use Camera"}
                </button>
            </div>

            {
                if let Some(error) = &model.camera_error {
                    html! { <p class="camera-error">{ error }</p> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
