//! Drop region with drag & drop and a click-to-pick fallback.
//!
//! Drag events from every descendant bubble up to the region's handlers,
//! where [`DropZoneController`] turns them into one highlighted flag.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Event, File, FileList, HtmlInputElement};

use crate::config::{DROP_ZONE_ID, FILE_INPUT_ID, HIGHLIGHT_CLASS};
use crate::state::{DropZoneController, HighlightChange};

/// Files of a `FileList`, in list order.
fn files_in(list: &FileList) -> Vec<File> {
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// Calls `on_file` once per dropped or picked file, in list order.
#[component]
pub fn DropZone(#[prop(into)] on_file: Callback<File>) -> impl IntoView {
    let controller = store_value(DropZoneController::new());
    let (highlighted, set_highlighted) = create_signal(false);

    let track = move |event: fn(&mut DropZoneController) -> HighlightChange| {
        match controller.try_update_value(event) {
            Some(HighlightChange::Apply) => {
                log::debug!("drag entered drop zone");
                set_highlighted.set(true);
            }
            Some(HighlightChange::Remove) => {
                log::debug!("drag left drop zone");
                set_highlighted.set(false);
            }
            Some(HighlightChange::Unchanged) | None => {}
        }
    };

    // Without this the browser refuses the drop.
    let on_drag_over = move |ev: DragEvent| ev.prevent_default();

    let on_drag_enter = move |_: DragEvent| track(DropZoneController::drag_enter);

    let on_drag_leave = move |_: DragEvent| track(DropZoneController::drag_leave);

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        track(DropZoneController::drop_files);

        let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) else {
            log::warn!("drop without a file list");
            return;
        };
        for file in files_in(&files) {
            on_file.call(file);
        }
    };

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            for file in files_in(&files) {
                on_file.call(file);
            }
        }
        // Picking the same file again must fire `change` again.
        input.set_value("");
    };

    // A click anywhere in the zone opens the picker.
    let open_picker = move |_| {
        if let Some(input) = document()
            .get_element_by_id(FILE_INPUT_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.click();
        }
    };

    let zone_class = move || {
        if highlighted.get() {
            format!("drop-zone {}", HIGHLIGHT_CLASS)
        } else {
            "drop-zone".to_string()
        }
    };

    view! {
        <div
            class=zone_class
            id=DROP_ZONE_ID
            on:dragover=on_drag_over
            on:dragenter=on_drag_enter
            on:dragleave=on_drag_leave
            on:drop=on_drop
            on:click=open_picker
        >
            <div class="drop-icon">"📤"</div>
            <div class="drop-text">"Drop files here"</div>
            <div class="drop-hint">"or click to choose"</div>
            <input
                type="file"
                id=FILE_INPUT_ID
                multiple=true
                style="display:none"
                on:click=|ev| ev.stop_propagation()
                on:change=on_file_change
            />
        </div>
    }
}
