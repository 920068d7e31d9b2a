//! Authenticated landing and about pages.
//!
//! The home page lists the user's papers, uploads new PDFs, and shows the
//! citation tree of a selected paper.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use super::failure_message;
use crate::net::error::ApiError;
use crate::net::types::{CitationNode, Paper, PaperUpload};
use crate::state::auth::AuthState;

/// Header greeting for the current snapshot.
pub fn greeting(auth: &AuthState) -> String {
    match auth.display_name() {
        Some(name) => format!("Signed in as {name}"),
        None if auth.authenticated => "Loading profile...".to_owned(),
        None => "Not signed in".to_owned(),
    }
}

/// One-line label for a paper row.
pub fn paper_label(paper: &Paper) -> String {
    match paper.doi.as_deref().filter(|doi| !doi.is_empty()) {
        Some(doi) => format!("{} ({doi})", paper.title),
        None => paper.title.clone(),
    }
}

/// Papers to render and the status line for a list fetch.
pub fn list_outcome(result: Result<Vec<Paper>, ApiError>) -> (Vec<Paper>, String) {
    match result {
        Ok(papers) if papers.is_empty() => (papers, "No papers uploaded yet.".to_owned()),
        Ok(papers) => (papers, String::new()),
        Err(err) => (Vec::new(), failure_message(&err).unwrap_or_default()),
    }
}

/// Only PDFs are accepted by the upload endpoint.
pub fn validate_upload_name(filename: &str) -> Result<(), &'static str> {
    let lower = filename.to_ascii_lowercase();
    if lower.len() > ".pdf".len() && lower.ends_with(".pdf") {
        Ok(())
    } else {
        Err("Choose a PDF file.")
    }
}

pub fn upload_summary(upload: &PaperUpload) -> String {
    match upload.citation_count {
        1 => format!("Uploaded \"{}\": 1 citation found.", upload.title),
        n => format!("Uploaded \"{}\": {n} citations found.", upload.title),
    }
}

/// One line of a flattened citation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CitationRow {
    pub depth: usize,
    pub label: String,
    pub resolved: bool,
}

/// Flatten `root` depth-first, children in citation order.
pub fn citation_rows(root: &CitationNode) -> Vec<CitationRow> {
    let mut rows = Vec::with_capacity(root.size());
    push_rows(root, 0, &mut rows);
    rows
}

fn push_rows(node: &CitationNode, depth: usize, rows: &mut Vec<CitationRow>) {
    let label = match node.raw_text.as_deref().filter(|t| !node.resolved() && !t.is_empty()) {
        Some(raw) => raw.to_owned(),
        None => node.name.clone(),
    };
    rows.push(CitationRow { depth, label, resolved: node.resolved() });

    let mut children: Vec<&CitationNode> = node.children.iter().collect();
    children.sort_by_key(|c| c.cite_order.unwrap_or(i64::MAX));
    for child in children {
        push_rows(child, depth + 1, rows);
    }
}

#[cfg(feature = "csr")]
pub use view::{AboutPage, HomePage};

#[cfg(feature = "csr")]
mod view {
    use std::rc::Rc;

    use leptos::prelude::*;
    use wasm_bindgen::JsCast;

    use super::{
        CitationRow, citation_rows, greeting, list_outcome, paper_label, upload_summary, validate_upload_name,
    };
    use crate::app::AppContextStore;
    use crate::net::papers::PapersApi;
    use crate::net::transport::BrowserTransport;
    use crate::net::types::Paper;
    use crate::pages::failure_message;
    use crate::state::auth::AuthState;

    async fn refresh(api: Rc<PapersApi<BrowserTransport>>, papers: RwSignal<Vec<Paper>>, status: RwSignal<String>) {
        let (list, message) = list_outcome(api.list().await);
        papers.set(list);
        status.set(message);
    }

    async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
        let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
            .await
            .map_err(|e| format!("{e:?}"))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }

    #[component]
    fn SessionHeader() -> impl IntoView {
        let ctx = expect_context::<AppContextStore>();
        let auth = expect_context::<RwSignal<AuthState>>();

        let on_logout = move |_| {
            let ctx = ctx.get_value();
            leptos::task::spawn_local(async move {
                ctx.session.logout().await;
            });
        };

        view! {
            <header class="session-header">
                <nav>
                    <a href="/">"Papers"</a>
                    <a href="/about">"About"</a>
                </nav>
                <span class="session-header__user">{move || greeting(&auth.get())}</span>
                <Show when=move || auth.get().is_admin>
                    <span class="session-header__badge">"admin"</span>
                </Show>
                <button class="session-header__logout" on:click=on_logout>"Sign out"</button>
            </header>
        }
    }

    #[component]
    pub fn HomePage() -> impl IntoView {
        let ctx = expect_context::<AppContextStore>();
        let papers = RwSignal::new(Vec::<Paper>::new());
        let loading = RwSignal::new(true);
        let status = RwSignal::new(String::new());
        let uploading = RwSignal::new(false);
        let selected = RwSignal::new(None::<Paper>);
        let citations = RwSignal::new(Vec::<CitationRow>::new());
        let detail_status = RwSignal::new(String::new());

        let api = ctx.get_value().papers;
        leptos::task::spawn_local(async move {
            refresh(api, papers, status).await;
            loading.set(false);
        });

        let on_file = move |ev: leptos::ev::Event| {
            if uploading.get() {
                return;
            }
            let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let filename = file.name();
            if let Err(message) = validate_upload_name(&filename) {
                status.set(message.to_owned());
                return;
            }
            uploading.set(true);
            status.set(format!("Uploading {filename}..."));

            let api = ctx.get_value().papers;
            leptos::task::spawn_local(async move {
                let bytes = match read_file(&file).await {
                    Ok(bytes) => bytes,
                    Err(detail) => {
                        log::warn!("reading {filename} failed: {detail}");
                        status.set(format!("Could not read {filename}."));
                        uploading.set(false);
                        return;
                    }
                };
                match api.upload(&filename, bytes).await {
                    Ok(upload) => {
                        refresh(api, papers, status).await;
                        status.set(upload_summary(&upload));
                    }
                    Err(err) => status.set(failure_message(&err).unwrap_or_default()),
                }
                input.set_value("");
                uploading.set(false);
            });
        };

        let show_citations = move |id: i64| {
            let api = ctx.get_value().papers;
            citations.set(Vec::new());
            detail_status.set("Loading citations...".to_owned());
            leptos::task::spawn_local(async move {
                let (paper, tree) = futures::join!(api.get(id), api.tree(id));
                match (paper, tree) {
                    (Ok(paper), Ok(tree)) => {
                        selected.set(Some(paper));
                        citations.set(citation_rows(&tree));
                        detail_status.set(String::new());
                    }
                    (Err(err), _) | (_, Err(err)) => {
                        selected.set(None);
                        detail_status.set(failure_message(&err).unwrap_or_default());
                    }
                }
            });
        };

        view! {
            <div class="home-page">
                <SessionHeader/>
                <main>
                    <h2>"Papers"</h2>
                    <label class="upload-button">
                        "Upload PDF"
                        <input
                            type="file"
                            accept="application/pdf"
                            disabled=move || uploading.get()
                            on:change=on_file
                        />
                    </label>
                    <Show when=move || !status.get().is_empty()>
                        <p class="home-page__status">{move || status.get()}</p>
                    </Show>
                    <Show
                        when=move || !loading.get()
                        fallback=|| view! { <p class="home-page__status">"Loading..."</p> }
                    >
                        <ul class="paper-list">
                            <For
                                each=move || papers.get()
                                key=|paper| paper.id
                                children=move |paper| {
                                    let id = paper.id;
                                    view! {
                                        <li class="paper-list__item">
                                            <span>{paper_label(&paper)}</span>
                                            <button on:click=move |_| show_citations(id)>"Citations"</button>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </Show>
                    <section class="citation-tree">
                        <Show when=move || selected.get().is_some()>
                            <h3>{move || selected.get().map(|p| paper_label(&p)).unwrap_or_default()}</h3>
                        </Show>
                        <Show when=move || !detail_status.get().is_empty()>
                            <p class="home-page__status">{move || detail_status.get()}</p>
                        </Show>
                        <ul>
                            <For
                                each=move || citations.get().into_iter().enumerate()
                                key=|(index, row)| (*index, row.label.clone())
                                children=|(_, row)| {
                                    let class = if row.resolved {
                                        "citation-tree__row"
                                    } else {
                                        "citation-tree__row citation-tree__row--unresolved"
                                    };
                                    view! {
                                        <li class=class style=format!("padding-left: {}rem", row.depth)>
                                            {row.label}
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </section>
                </main>
            </div>
        }
    }

    #[component]
    pub fn AboutPage() -> impl IntoView {
        view! {
            <div class="about-page">
                <SessionHeader/>
                <main>
                    <h2>"About"</h2>
                    <p>"Upload papers and explore the citation trees extracted from them."</p>
                </main>
            </div>
        }
    }
}
