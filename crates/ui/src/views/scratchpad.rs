use std::time::Instant;

use dioxus::desktop::DesktopContext;
use dioxus::prelude::*;
use tracing::error;

use crate::context::AppContext;
use crate::vm::ScratchpadVm;

/// Current scale factor of the window, or 1.0 outside a desktop window.
fn device_pixel_ratio(desktop: Option<&DesktopContext>) -> f32 {
    #[allow(clippy::cast_possible_truncation)]
    desktop.map_or(1.0, |desktop| desktop.window.scale_factor() as f32)
}

/// Rebuilds the displayed image if the bitmap changed; `force` skips the throttle.
fn sync_image(vm: &mut ScratchpadVm, force: bool) {
    if let Err(err) = vm.sync_image(force, Instant::now()) {
        error!(%err, "scratchpad encode failed");
    }
}

#[component]
pub fn ScratchpadView() -> Element {
    let ctx = use_context::<AppContext>();
    let resize_delay = ctx.config().resize_delay;
    let desktop = use_hook(try_consume_context::<DesktopContext>);
    let initial_ratio = device_pixel_ratio(desktop.as_ref());
    let mut pad = use_signal(move || match ScratchpadVm::new(initial_ratio) {
        Ok(vm) => Some(vm),
        Err(err) => {
            error!(%err, "scratchpad unavailable");
            None
        }
    });

    let on_resize = move |evt: Event<ResizeData>| {
        let Ok(size) = evt.get_content_box_size() else {
            return;
        };
        // The window may have moved to a screen with another scale factor.
        let pixel_ratio = device_pixel_ratio(desktop.as_ref());
        let Some(ticket) = pad
            .write()
            .as_mut()
            .map(|vm| vm.request_resize(size.width, size.height, pixel_ratio))
        else {
            return;
        };
        spawn(async move {
            tokio::time::sleep(resize_delay).await;
            if let Some(vm) = pad.write().as_mut() {
                match vm.flush_resize(ticket) {
                    Ok(true) => sync_image(vm, true),
                    Ok(false) => {}
                    Err(err) => error!(%err, "scratchpad resize failed"),
                }
            }
        });
    };

    let pad_guard = pad.read();
    let swatches = pad_guard
        .as_ref()
        .map(ScratchpadVm::swatches)
        .unwrap_or_default();
    let image = pad_guard.as_ref().map(|vm| vm.image_url().to_string());
    drop(pad_guard);

    rsx! {
        section { class: "scratchpad",
            header { class: "scratchpad__toolbar",
                h3 { class: "scratchpad__title", "草稿區" }
                div { class: "scratchpad__colors",
                    for swatch in swatches {
                        button {
                            key: "{swatch.hex}",
                            class: if swatch.selected { "swatch swatch--selected" } else { "swatch" },
                            style: "background-color: {swatch.hex};",
                            r#type: "button",
                            aria_label: "{swatch.aria_label}",
                            onclick: move |_| {
                                if let Some(vm) = pad.write().as_mut() {
                                    vm.set_color(swatch.color);
                                }
                            },
                        }
                    }
                }
                button {
                    class: "btn btn-danger scratchpad__clear",
                    id: "scratchpad-clear",
                    r#type: "button",
                    onclick: move |_| {
                        if let Some(vm) = pad.write().as_mut() {
                            vm.clear();
                            sync_image(vm, true);
                        }
                    },
                    "清除"
                }
            }
            div {
                class: "scratchpad__surface",
                onresize: on_resize,
                onpointerdown: move |evt: PointerEvent| {
                    let at = evt.element_coordinates();
                    if let Some(vm) = pad.write().as_mut() {
                        vm.pointer_down(at.x, at.y);
                    }
                },
                onpointermove: move |evt: PointerEvent| {
                    let drawing = pad.peek().as_ref().is_some_and(|vm| vm.surface().is_drawing());
                    if !drawing {
                        return;
                    }
                    let at = evt.element_coordinates();
                    if let Some(vm) = pad.write().as_mut() {
                        if vm.pointer_move(at.x, at.y) {
                            sync_image(vm, false);
                        }
                    }
                },
                onpointerup: move |_| {
                    if let Some(vm) = pad.write().as_mut() {
                        vm.pointer_up();
                        sync_image(vm, true);
                    }
                },
                onpointerleave: move |_| {
                    if let Some(vm) = pad.write().as_mut() {
                        vm.pointer_up();
                        sync_image(vm, true);
                    }
                },
                if let Some(url) = image {
                    img {
                        class: "scratchpad__image",
                        src: "{url}",
                        alt: "",
                        draggable: "false",
                    }
                }
            }
        }
    }
}
