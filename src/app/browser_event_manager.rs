// src/app/browser_event_manager.rs
//! Handles attaching and detaching browser event listeners.
//! Canvas の mousedown / mousemove は常設、window の mousemove / mouseup は
//! ドラッグ開始時に付けてドラッグ終了時に外す (キャンバスの外で離しても
//! セッションがちゃんと終わるように！)。

use std::sync::{Arc, Mutex};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Event, HtmlCanvasElement, MouseEvent};

use crate::app::drag_apply_handler;
use crate::app::drag_handler::{self, DragSession};
use crate::app::event_handler::{self, ClickTarget};
use crate::config::layout::CARDS_TO_ADD;
use crate::ecs::system::System;
use crate::ecs::world::World;
use crate::systems::SpawnCardsSystem;
use log::error;

/// ドラッグ用 window リスナーのクロージャ置き場。
/// デタッチする時に同じクロージャ参照が要るから、Arc<Mutex<Option<...>>> で共有するよ。
pub(crate) type ClosureSlot = Arc<Mutex<Option<Closure<dyn FnMut(Event)>>>>;

/// MouseEvent のビューポート座標をキャンバスローカル座標に直すヘルパー。
/// window リスナー経由のイベントでも、キャンバス基準の (x, y) が欲しいからね！
fn pointer_position(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    (
        event.client_x() as f32 - rect.left() as f32,
        event.client_y() as f32 - rect.top() as f32,
    )
}

/// Attaches the permanent canvas listeners (mousedown + mousemove).
/// 返ってきた Closure は呼び出し側 (CardTableApp) が保持し続けること！
/// 捨てちゃうとリスナーが即死するよ。☠️
pub(crate) fn attach_canvas_listeners(
    canvas: &HtmlCanvasElement,
    world_arc: Arc<Mutex<World>>,
    session_arc: Arc<Mutex<Option<DragSession>>>,
    pointer_arc: Arc<Mutex<(f32, f32)>>,
    window_mousemove_closure_arc: ClosureSlot,
    window_mouseup_closure_arc: ClosureSlot,
) -> Result<Vec<Closure<dyn FnMut(Event)>>, JsValue> {
    let mut kept_closures = Vec::new();

    // --- MouseDown Listener (常設) ---
    {
        let canvas_clone = canvas.clone();
        let world_arc_clone = Arc::clone(&world_arc);
        let session_arc_clone = Arc::clone(&session_arc);
        let pointer_arc_clone = Arc::clone(&pointer_arc);
        let move_slot_clone = Arc::clone(&window_mousemove_closure_arc);
        let up_slot_clone = Arc::clone(&window_mouseup_closure_arc);

        let mousedown_closure = Closure::wrap(Box::new(move |event: Event| {
            let Ok(mouse_event) = event.dyn_into::<MouseEvent>() else {
                error!("Failed to cast event to MouseEvent in mousedown listener");
                return;
            };
            let (x, y) = pointer_position(&canvas_clone, &mouse_event);
            if let Ok(mut pointer) = pointer_arc_clone.lock() {
                *pointer = (x, y);
            }

            // まず何が押されたか判定 (読み取りだけなので短いロックで！)
            let target = match world_arc_clone.lock() {
                Ok(world) => event_handler::find_clicked_element(&world, x, y),
                Err(e) => {
                    error!("Failed to lock world in mousedown: {}", e);
                    return;
                }
            };

            match target {
                Some(ClickTarget::AddButton) => {
                    // ボタン！カードを1バッチ追加するだけ。ドラッグは始まらない。
                    if let Ok(mut world) = world_arc_clone.lock() {
                        SpawnCardsSystem::new(CARDS_TO_ADD).run(&mut world);
                    }
                }
                Some(ClickTarget::Card(_)) => {
                    // カード！ドラッグセッション開始を試みる。
                    let started = match (world_arc_clone.lock(), session_arc_clone.lock()) {
                        (Ok(mut world), Ok(mut session)) => {
                            drag_handler::handle_drag_start(&mut world, &mut session, x, y)
                        }
                        _ => {
                            error!("Failed to lock world/session in mousedown");
                            false
                        }
                    };

                    if started {
                        // ドラッグ中だけ window リスナーを付ける (テーブルの外まで追跡！)
                        if let Err(e) = attach_drag_listeners(
                            &canvas_clone,
                            Arc::clone(&world_arc_clone),
                            Arc::clone(&session_arc_clone),
                            Arc::clone(&pointer_arc_clone),
                            Arc::clone(&move_slot_clone),
                            Arc::clone(&up_slot_clone),
                        ) {
                            error!("Error attaching drag listeners: {:?}", e);
                        }
                    }
                }
                None => {} // 背景クリック。何もしない。
            }
        }) as Box<dyn FnMut(Event)>);

        canvas.add_event_listener_with_callback(
            "mousedown",
            mousedown_closure.as_ref().unchecked_ref(),
        )?;
        kept_closures.push(mousedown_closure);
    }

    // --- MouseMove Listener (常設、診断表示用のポインタ追跡) ---
    {
        let canvas_clone = canvas.clone();
        let world_arc_clone = Arc::clone(&world_arc);
        let session_arc_clone = Arc::clone(&session_arc);
        let pointer_arc_clone = Arc::clone(&pointer_arc);

        let mousemove_closure = Closure::wrap(Box::new(move |event: Event| {
            let Ok(mouse_event) = event.dyn_into::<MouseEvent>() else {
                return;
            };
            let (x, y) = pointer_position(&canvas_clone, &mouse_event);
            if let Ok(mut pointer) = pointer_arc_clone.lock() {
                *pointer = (x, y);
            }

            // セッション中なら掴んでいるチェーンも付いてくる
            let session_active = session_arc_clone
                .lock()
                .map(|session| session.is_some())
                .unwrap_or(false);
            if session_active {
                if let Ok(mut world) = world_arc_clone.lock() {
                    drag_handler::update_dragged_positions(&mut world, x, y);
                }
            }
        }) as Box<dyn FnMut(Event)>);

        canvas.add_event_listener_with_callback(
            "mousemove",
            mousemove_closure.as_ref().unchecked_ref(),
        )?;
        kept_closures.push(mousemove_closure);
    }

    Ok(kept_closures)
}

/// Attaches mousemove and mouseup listeners to the window for drag updates and end detection.
pub(crate) fn attach_drag_listeners(
    canvas: &HtmlCanvasElement,
    world_arc: Arc<Mutex<World>>,
    session_arc: Arc<Mutex<Option<DragSession>>>,
    pointer_arc: Arc<Mutex<(f32, f32)>>,
    window_mousemove_closure_arc: ClosureSlot,
    window_mouseup_closure_arc: ClosureSlot,
) -> Result<(), JsValue> {
    // --- MouseMove Listener ---
    {
        let canvas_clone = canvas.clone();
        let world_arc_clone = Arc::clone(&world_arc);
        let pointer_arc_clone = Arc::clone(&pointer_arc);

        let mousemove_closure = Closure::wrap(Box::new(move |event: Event| {
            if let Ok(mouse_event) = event.dyn_into::<MouseEvent>() {
                let (x, y) = pointer_position(&canvas_clone, &mouse_event);
                if let Ok(mut pointer) = pointer_arc_clone.lock() {
                    *pointer = (x, y);
                }
                if let Ok(mut world) = world_arc_clone.lock() {
                    drag_handler::update_dragged_positions(&mut world, x, y);
                }
            } else {
                error!("Failed to cast event to MouseEvent in mousemove listener");
            }
        }) as Box<dyn FnMut(Event)>);

        let window = window().ok_or("Failed to get window")?;
        window.add_event_listener_with_callback(
            "mousemove",
            mousemove_closure.as_ref().unchecked_ref(),
        )?;
        if let Ok(mut slot) = window_mousemove_closure_arc.lock() {
            *slot = Some(mousemove_closure); // Store the closure
        }
    }

    // --- MouseUp Listener ---
    {
        let canvas_clone = canvas.clone();
        let world_arc_clone = Arc::clone(&world_arc);
        let session_arc_clone = Arc::clone(&session_arc);
        let window_mousemove_closure_arc_clone = Arc::clone(&window_mousemove_closure_arc);
        let window_mouseup_closure_arc_clone = Arc::clone(&window_mouseup_closure_arc);

        let mouseup_closure = Closure::wrap(Box::new(move |event: Event| {
            if let Ok(mouse_event) = event.dyn_into::<MouseEvent>() {
                let (x, y) = pointer_position(&canvas_clone, &mouse_event);

                // --- ドロップ解決！ ---
                match (world_arc_clone.lock(), session_arc_clone.lock()) {
                    (Ok(mut world), Ok(mut session)) => {
                        drag_apply_handler::handle_drag_end(&mut world, &mut session, x, y);
                    }
                    _ => error!("Failed to lock world/session in mouseup"),
                }

                // Detach AFTER the drop logic finishes.
                // This ensures listeners are removed even if handle_drag_end bails early.
                if let Err(e) = detach_drag_listeners(
                    &window_mousemove_closure_arc_clone,
                    &window_mouseup_closure_arc_clone,
                ) {
                    error!("Error detaching listeners in mouseup: {:?}", e);
                }
            } else {
                error!("Failed to cast event to MouseEvent in mouseup listener");
            }
        }) as Box<dyn FnMut(Event)>);

        let window = window().ok_or("Failed to get window")?;
        window.add_event_listener_with_callback(
            "mouseup",
            mouseup_closure.as_ref().unchecked_ref(),
        )?;
        if let Ok(mut slot) = window_mouseup_closure_arc.lock() {
            *slot = Some(mouseup_closure); // Store the closure
        }
    }

    Ok(())
}

/// Detaches the mousemove and mouseup listeners from the window.
pub(crate) fn detach_drag_listeners(
    window_mousemove_closure_arc: &ClosureSlot,
    window_mouseup_closure_arc: &ClosureSlot,
) -> Result<(), JsValue> {
    let window = window().ok_or("Failed to get window")?;

    // --- Remove MouseMove Listener ---
    if let Ok(mut slot) = window_mousemove_closure_arc.lock() {
        if let Some(closure) = slot.take() {
            window.remove_event_listener_with_callback(
                "mousemove",
                closure.as_ref().unchecked_ref(),
            )?;
            // closure はここでドロップされてメモリも解放される
        }
    }

    // --- Remove MouseUp Listener ---
    if let Ok(mut slot) = window_mouseup_closure_arc.lock() {
        if let Some(closure) = slot.take() {
            window.remove_event_listener_with_callback(
                "mouseup",
                closure.as_ref().unchecked_ref(),
            )?;
        }
    }

    Ok(())
}
