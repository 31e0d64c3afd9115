//! Boot info panel for the Cockpit services page, built for WebAssembly.

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use crate::{host, styles};
    use bootplot_core::{
        navigation_for, AnalyzeCommand, BootMode, BootPlot, LoadState, LoadTracker, PlotConfig,
        LEGEND, SERVICE_ATTR,
    };
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, Window};
    use yew::prelude::*;
    use yew::TargetCast;

    #[derive(Properties, PartialEq)]
    pub struct BootInfoProps {
        /// `"system"` for the system manager, anything else for the user's session.
        pub user: AttrValue,
        #[prop_or_default]
        pub config: PlotConfig,
    }

    #[function_component(BootInfo)]
    pub fn boot_info(props: &BootInfoProps) -> Html {
        let mode = BootMode::from_user(&props.user);
        let tracker = use_mut_ref(LoadTracker::default);
        let redraw = use_force_update();

        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        {
            let tracker = tracker.clone();
            let redraw = redraw.clone();
            use_effect_with((mode, props.config.clone()), move |(mode, config)| {
                let mode = *mode;
                let config = config.clone();
                let was_loading = tracker.borrow().state().is_loading();
                let ticket = tracker.borrow_mut().begin(mode);
                if !was_loading {
                    redraw.force_update();
                }

                wasm_bindgen_futures::spawn_local(async move {
                    let command = AnalyzeCommand::new(mode, &config);
                    let result = match host::run_analyzer(&command).await {
                        Ok(svg) => bootplot_svg::transform_plot(&svg, &config),
                        Err(err) => Err(err),
                    };
                    if let Err(err) = &result {
                        console::error_1(&JsValue::from_str(&err.to_string()));
                    }
                    if tracker.borrow_mut().finish(ticket, result) {
                        redraw.force_update();
                    }
                });
                || ()
            });
        }

        let on_plot_click = {
            let config = props.config.clone();
            Callback::from(move |event: MouseEvent| {
                let service = event
                    .target_dyn_into::<Element>()
                    .and_then(|element| element.get_attribute(SERVICE_ATTR));
                if let Some(path) = navigation_for(service.as_deref(), &config) {
                    if let Err(err) = host::jump(&path) {
                        console::error_1(&err);
                    }
                }
            })
        };

        let tracker = tracker.borrow();
        let body = match tracker.state() {
            LoadState::Loading => render_loading(),
            LoadState::Failed(error) => render_failure(error),
            LoadState::Ready(plot) => render_plot(plot, on_plot_click),
        };

        html! {
            <div class="bootplot-section">
                { body }
            </div>
        }
    }

    fn render_loading() -> Html {
        html! {
            <div class="bootplot-empty">
                <h4>{"Loading"}</h4>
                <div class="bootplot-spinner" role="progressbar" aria-label="Loading"></div>
            </div>
        }
    }

    fn render_failure(error: &str) -> Html {
        html! {
            <div class="bootplot-empty">
                <h4>{"Failure"}</h4>
                <p>{"Are you sure systemd-analyze is available?"}</p>
                <p>{"systemd-analyze failed to load boot info and returned the following error:"}</p>
                <pre class="bootplot-code"><code id="code-content">{ error.to_string() }</code></pre>
            </div>
        }
    }

    fn render_plot(plot: &BootPlot, on_click: Callback<MouseEvent>) -> Html {
        let markup = Html::from_html_unchecked(AttrValue::from(plot.markup.clone()));

        html! {
            <section class="bootplot-card">
                <h2>{"Boot Info"}</h2>
                <p class="bootplot-summary">{ plot.summary.clone().unwrap_or_default() }</p>
                <ul class="legend">
                    {
                        for LEGEND.iter().map(|entry| html! {
                            <li>
                                <div class={classes!("legendColor", entry.class)}></div>
                                { entry.label }
                            </li>
                        })
                    }
                </ul>
                <div class="chart-container">
                    <div class="chart" role="presentation" onclick={on_click}>
                        { markup }
                    </div>
                </div>
            </section>
        }
    }

    #[wasm_bindgen]
    pub fn mount_boot_info(selector: &str, user: &str) -> Result<(), JsValue> {
        let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Cannot access document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Invalid selector: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("No element matches the selector"))?;

        yew::Renderer::<BootInfo>::with_root_and_props(
            target,
            BootInfoProps {
                user: AttrValue::from(user.to_string()),
                config: PlotConfig::default(),
            },
        )
        .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{mount_boot_info, BootInfo, BootInfoProps};

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_boot_info(_: &str, _: &str) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "bootplot-ui only supports the wasm32 target",
    ))
}
