//! The contenteditable surface.
//!
//! Renders the document from `render_groups` and routes every edit through
//! the shell. The browser is never allowed to change the DOM on its own:
//! keydown runs bound commands, `beforeinput` runs everything else, and the
//! selection is read back from the DOM before each of them.

use dioxus::prelude::*;
use dioxus::web::WebEventExt;
use gloo_events::EventListener;
use quire_editor_browser::{
    BlockGroup, BlockRender, BrowserSelection, EditorShell, KeyBindings, KeydownResult,
    SelectionPlatform, SpanRender, clipboard_text, get_data_from_event, get_input_type_from_event,
    get_target_range_from_event, is_composing, keycombo_from_event, listen_beforeinput, platform,
    render_groups,
};
use wasm_bindgen::JsCast;

/// DOM id of the editable element.
pub const EDITOR_ID: &str = "quire-editor";

/// Adopt the DOM selection into the shell when it differs from the model's.
fn sync_selection(mut shell: Signal<EditorShell>) {
    let platform = BrowserSelection::new(EDITOR_ID);
    let read = {
        let shell = shell.peek();
        platform.read_selection(shell.state().current_content())
    };
    match read {
        Ok(Some(selection)) => {
            if *shell.peek().state().selection() == selection {
                return;
            }
            tracing::trace!(?selection, "selection from dom");
            if let Err(e) = shell.write().select(selection) {
                tracing::warn!("rejected dom selection: {e}");
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("reading dom selection failed: {e}"),
    }
}

#[component]
pub fn EditorSurface(mut shell: Signal<EditorShell>, spell_check: bool) -> Element {
    let groups = render_groups(shell.read().state().current_content());

    // Put the DOM selection back after every render that moved it.
    use_effect(move || {
        let shell = shell.read();
        let selection = shell.state().selection();
        if !selection.has_focus {
            return;
        }
        let platform = BrowserSelection::new(EDITOR_ID);
        if let Ok(Some(current)) = platform.read_selection(shell.state().current_content()) {
            if current.anchor == selection.anchor && current.focus == selection.focus {
                return;
            }
        }
        if let Err(e) = platform.restore_selection(selection) {
            tracing::warn!("restoring selection failed: {e}");
        }
    });

    // beforeinput is attached natively so preventDefault is honoured.
    // Store in signal instead of forget - the listener drops when the surface unmounts
    let mut beforeinput = use_signal(|| None::<EventListener>);
    use_effect(move || {
        let Some(editor) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(EDITOR_ID))
        else {
            tracing::warn!("editor element missing, beforeinput not attached");
            return;
        };
        let listener = listen_beforeinput(&editor, move |evt| {
            if is_composing(evt) {
                return;
            }
            let input_type = get_input_type_from_event(evt);
            let data = get_data_from_event(evt);
            tracing::debug!(?input_type, "beforeinput");

            sync_selection(shell);
            let target = get_target_range_from_event(
                evt,
                EDITOR_ID,
                shell.peek().state().current_content(),
            );
            if shell.write().handle_input(&input_type, data.as_deref(), target) {
                evt.prevent_default();
            }
        });
        beforeinput.set(Some(listener));
    });

    let bindings = KeyBindings::default_for_platform(platform().apple());
    let spellcheck = if spell_check { "true" } else { "false" };

    rsx! {
        div {
            id: EDITOR_ID,
            class: "RichEditor-editor",
            contenteditable: "true",
            spellcheck,

            onkeydown: move |evt| {
                let combo = keycombo_from_event(&evt.as_web_event());
                sync_selection(shell);
                match shell.write().handle_keydown(&bindings, &combo) {
                    KeydownResult::Handled => evt.prevent_default(),
                    // Navigation: let the browser move, sync in keyup.
                    KeydownResult::PassThrough => {}
                    // Text input: beforeinput handles it.
                    KeydownResult::NotHandled => {}
                }
            },

            onkeyup: move |_| sync_selection(shell),
            onmouseup: move |_| sync_selection(shell),

            onpaste: move |evt| {
                let web_evt = evt.as_web_event();
                let Some(clipboard) = web_evt.dyn_ref::<web_sys::ClipboardEvent>() else {
                    return;
                };
                evt.prevent_default();
                if let Some(text) = clipboard_text(clipboard) {
                    sync_selection(shell);
                    shell.write().paste_text(&text);
                }
            },

            for group in groups {
                SurfaceGroup { key: "{group_key(&group)}", group }
            }
        }
    }
}

fn group_key(group: &BlockGroup) -> String {
    group
        .blocks
        .first()
        .map(|b| b.key.to_string())
        .unwrap_or_default()
}

#[component]
fn SurfaceGroup(group: BlockGroup) -> Element {
    let blocks = group.blocks.iter().map(|block| {
        rsx! {
            SurfaceBlock { key: "{block.key}-{block.source_hash}", block: block.clone() }
        }
    });
    match group.list.as_ref() {
        Some(list) if list.element == "ol" => rsx! {
            ol { class: list.class, {blocks} }
        },
        Some(list) => rsx! {
            ul { class: list.class, {blocks} }
        },
        None => rsx! {
            {blocks}
        },
    }
}

/// One block element. Keyed by content hash, so a changed block is rebuilt
/// rather than patched over whatever the browser left in it.
#[component]
fn SurfaceBlock(block: BlockRender) -> Element {
    let key = block.key.to_string();
    let class = block.class;
    let contents = block_contents(&block.spans);
    match block.element {
        "h1" => rsx! { h1 { "data-block-key": key, class, {contents} } },
        "h2" => rsx! { h2 { "data-block-key": key, class, {contents} } },
        "h3" => rsx! { h3 { "data-block-key": key, class, {contents} } },
        "h4" => rsx! { h4 { "data-block-key": key, class, {contents} } },
        "h5" => rsx! { h5 { "data-block-key": key, class, {contents} } },
        "h6" => rsx! { h6 { "data-block-key": key, class, {contents} } },
        "blockquote" => rsx! { blockquote { "data-block-key": key, class, {contents} } },
        "li" => rsx! { li { "data-block-key": key, class, {contents} } },
        "pre" => rsx! { pre { "data-block-key": key, class, {contents} } },
        "div" => rsx! { div { "data-block-key": key, class, {contents} } },
        _ => rsx! { p { "data-block-key": key, class, {contents} } },
    }
}

fn block_contents(spans: &[SpanRender]) -> Element {
    if spans.is_empty() {
        return rsx! { br {} };
    }
    let runs = spans.iter().map(|run| match &run.link {
        Some(href) => rsx! {
            a {
                key: "{run.offset}",
                href: "{href}",
                "data-offset": "{run.offset}",
                style: run.css.clone(),
                "{run.text}"
            }
        },
        None => rsx! {
            span {
                key: "{run.offset}",
                "data-offset": "{run.offset}",
                style: run.css.clone(),
                "{run.text}"
            }
        },
    });
    rsx! { {runs} }
}
