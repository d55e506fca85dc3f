use super::super::{Model, Msg};
use super::utils::debounce;
use shared::flow::SelectedImage;
use yew::prelude::*;

pub fn render_preview_area(image: &SelectedImage, ctx: &Context<Model>, loading: bool) -> Html {
    let link = ctx.link().clone();

    html! {
        <div id="preview-container">
            <img id="actual-image-preview"
                src={image.preview_url()}
                alt="Image Preview"
                style="max-width:100%; max-height: 400px; object-fit: contain; margin-bottom: 10px;" />
            <p class="preview-filename">{ &image.name }</p>
            <div class="button-container">
                <button
                    class="analyze-btn"
                    onclick={debounce(300, move || link.send_message(Msg::Analyze))}
                    disabled={loading}
                >
                    { render_analyze_button_content(loading) }
                </button>
            </div>
        </div>
    }
}

fn render_analyze_button_content(loading: bool) -> Html {
    if loading {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Analyze Skin"}</> }
    }
}
