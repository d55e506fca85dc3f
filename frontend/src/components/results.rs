use super::super::{Model, Msg};
use super::utils::debounce;
use shared::flow::SelectedImage;
use shared::report::{format_percentage, sorted_conditions};
use shared::AnalysisResponse;
use yew::prelude::*;

pub fn render_results(image: &SelectedImage, result: &AnalysisResponse, ctx: &Context<Model>) -> Html {
    let link = ctx.link().clone();
    let rec = &result.recommendations;

    html! {
        <div class="results-container">
            <div class="result-header">
                <img class="result-thumbnail" src={image.preview_url()} alt="Analyzed image" />
                <h2>
                    <i class="fa-solid fa-notes-medical"></i>
                    { format!(" {}", result.top_condition.display_name()) }
                </h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Confidence:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", result.confidence)}></div>
                    </div>
                    <div class="meter-value">{ format_percentage(result.confidence) }</div>
                </div>
            </div>

            <div class="detailed-results">
                <h3>{"All Conditions"}</h3>
                <div class="result-bars">
                    { for sorted_conditions(&result.all_conditions).into_iter().map(|(label, value)| html! {
                        <div class="result-item" key={label.id()}>
                            <div class="result-label">{ label.display_name() }</div>
                            <div class="result-bar-container">
                                <div class="result-bar" style={format!("width: {}%", value)}></div>
                            </div>
                            <div class="result-value">{ format_percentage(value) }</div>
                        </div>
                    })}
                </div>
            </div>

            <div class="recommendations">
                <h3>{"About this condition"}</h3>
                <p>{ &rec.description }</p>

                <h3>{"Skincare Tips"}</h3>
                <ol>
                    { for rec.tips.iter().map(|tip| html! { <li>{ tip }</li> }) }
                </ol>

                <div class="ingredients">
                    <div>
                        <h4>{"Ingredients to Look For"}</h4>
                        <ul>{ for rec.ingredients_to_look_for.iter().map(|i| html! { <li>{ i }</li> }) }</ul>
                    </div>
                    <div>
                        <h4>{"Ingredients to Avoid"}</h4>
                        <ul>{ for rec.ingredients_to_avoid.iter().map(|i| html! { <li>{ i }</li> }) }</ul>
                    </div>
                </div>
            </div>

            <div class="button-container">
                <button
                    class="analyze-btn secondary"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::DownloadReport)
                    })}
                >
                    <i class="fa-solid fa-download"></i>{" Download Report"}
                </button>
                <button
                    class="analyze-btn"
                    onclick={debounce(300, move || link.send_message(Msg::Reset))}
                >
                    <i class="fa-solid fa-rotate-left"></i>{" New Analysis"}
                </button>
            </div>
        </div>
    }
}
