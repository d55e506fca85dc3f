use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-spa"></i> {" Skin Analysis"}</h1>
            <p class="subtitle">{"Upload or capture a photo of your skin to get personalised care tips"}</p>
        </header>
    }
}
