// src/lib.rs

// WASM と JavaScript を繋ぐための基本！
use wasm_bindgen::prelude::*;

// 標準ライブラリから、スレッドセーフな共有ポインタとミューテックスを使うよ。
// イベントリスナーのコールバック関数からでも安全にデータを共有・変更するために必要！
use std::sync::{Arc, Mutex};

// 自分で作ったモジュールたち！ これでコードを整理してるんだ。
pub mod app;
pub mod components;
pub mod config;
pub mod ecs;
pub mod logic;
pub mod systems;

// 各モジュールから必要な型をインポート！
use crate::app::browser_event_manager::{self, ClosureSlot};
use crate::app::drag_handler::DragSession;
use crate::app::{hover_handler, renderer, state_getter};
use crate::components::{Card, DraggingInfo, PileLink, Position};
use crate::config::layout::{CARDS_TO_ADD, PRE_GENERATE_CARDS};
use crate::ecs::system::System;
use crate::ecs::world::World;
use crate::systems::SpawnCardsSystem;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement};

// JavaScript の console.log を Rust から呼び出すための準備 (extern ブロック)。
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

// main 関数の代わりに、Wasm がロードされた時に最初に実行される関数だよ。
#[wasm_bindgen(start)]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
    log("Panic hook set!");
}

// --- テーブル全体のアプリケーション状態を管理する構造体 ---
// World (カードのレジストリ＋山グラフ) と、進行中のドラッグセッション、
// 直近のポインタ位置を持つファサード。JS 側はこの構造体だけ触ればOK！
#[wasm_bindgen]
pub struct CardTableApp {
    world: Arc<Mutex<World>>,
    drag_session: Arc<Mutex<Option<DragSession>>>,
    /// 直近のポインタ位置 (キャンバスローカル座標)。
    /// ブラウザはポインタ位置を同期的には教えてくれないから、
    /// mousemove のたびにここへキャッシュして、フレーム側で読むよ。
    pointer: Arc<Mutex<(f32, f32)>>,
    /// ドラッグ中だけ window に付くリスナーのクロージャ置き場
    window_mousemove_closure: ClosureSlot,
    window_mouseup_closure: ClosureSlot,
    /// 常設のキャンバスリスナー。ドロップ (解放じゃなくて破棄の方！) されると
    /// リスナーごと死ぬので、アプリが生きてる限りここで握っておく。
    canvas_closures: Vec<Closure<dyn FnMut(Event)>>,
    /// FPS計測用、前フレームのタイムスタンプ (ms)
    last_frame_ms: Arc<Mutex<Option<f64>>>,
}

// CardTableApp 構造体のメソッドを実装していくよ！
#[wasm_bindgen]
impl CardTableApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        log("CardTableApp: Initializing...");
        let mut world = World::new();
        // コンポーネント登録 (4種類。全部忘れずに！)
        world.register_component::<Card>();
        world.register_component::<Position>();
        world.register_component::<PileLink>();
        world.register_component::<DraggingInfo>();

        // 起動時のカードを一括生成！
        SpawnCardsSystem::new(PRE_GENERATE_CARDS).run(&mut world);
        log(&format!("CardTableApp: pre-generated {} cards.", world.card_count()));

        Self {
            world: Arc::new(Mutex::new(world)),
            drag_session: Arc::new(Mutex::new(None)),
            pointer: Arc::new(Mutex::new((0.0, 0.0))),
            window_mousemove_closure: Arc::new(Mutex::new(None)),
            window_mouseup_closure: Arc::new(Mutex::new(None)),
            canvas_closures: Vec::new(),
            last_frame_ms: Arc::new(Mutex::new(None)),
        }
    }

    /// キャンバスにイベントリスナーを取り付けるよ。起動時に一度だけ呼ぶこと！
    /// mousedown (掴む/ボタン) と mousemove (ポインタ追跡) が常設になる。
    pub fn attach(&mut self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        log("CardTableApp: attach() called.");
        let closures = browser_event_manager::attach_canvas_listeners(
            canvas,
            Arc::clone(&self.world),
            Arc::clone(&self.drag_session),
            Arc::clone(&self.pointer),
            Arc::clone(&self.window_mousemove_closure),
            Arc::clone(&self.window_mouseup_closure),
        )?;
        // クロージャは self が握って生かしておく
        self.canvas_closures = closures;
        log("CardTableApp: canvas listeners attached.");
        Ok(())
    }

    /// 1フレーム描画するよ。JS 側の requestAnimationFrame ループから毎回呼んでね！
    /// ホバープレビューの再計算 → 描画、の順。World はこの中では変更されない。
    pub fn render_frame(&self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Failed to get 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let world = self
            .world
            .lock()
            .map_err(|e| JsValue::from_str(&format!("Failed to lock world mutex: {}", e)))?;
        let session = self
            .drag_session
            .lock()
            .map_err(|e| JsValue::from_str(&format!("Failed to lock session mutex: {}", e)))?;
        let (pointer_x, pointer_y) = self
            .pointer
            .lock()
            .map(|p| *p)
            .unwrap_or((0.0, 0.0));

        // セッション中だけ、ドロップ先のプレビューを毎フレーム計算し直す。
        // コミットはしない！光らせるだけ！✨
        let preview = session.as_ref().and_then(|s| {
            hover_handler::compute_hover_preview(&world, s.origin, pointer_x, pointer_y)
        });

        // ポインタ直下の診断サマリーも毎フレーム計算
        let summary = state_getter::pointer_summary(&world, pointer_x, pointer_y);

        renderer::render_table(&world, &preview, &summary, self.measure_fps(), canvas, &context)
    }

    /// 「Add Card」ボタン相当の操作。カードを1バッチ追加するよ。
    /// (ボタンクリックは mousedown リスナーが処理するけど、JS から直接も呼べる！)
    pub fn add_cards(&self) {
        match self.world.lock() {
            Ok(mut world) => {
                SpawnCardsSystem::new(CARDS_TO_ADD).run(&mut world);
                log(&format!("CardTableApp: added cards, table now has {}.", world.card_count()));
            }
            Err(e) => log(&format!("CardTableApp: Failed to lock world for add_cards: {:?}", e)),
        }
    }

    /// テーブル全体の状態を JSON で返すよ (JS 側のデバッグパネル用)。
    pub fn get_table_state_json(&self) -> Result<JsValue, JsValue> {
        state_getter::get_table_state_json(&self.world)
    }

    // デバッグ用: カード総数取得
    pub fn get_card_count_debug(&self) -> usize {
        match self.world.lock() {
            Ok(world) => world.card_count(),
            Err(_) => 0,
        }
    }

    // デバッグ用: ポインタ直下の一番手前のカード番号取得
    pub fn get_top_card_debug(&self) -> Option<usize> {
        let (x, y) = self.pointer.lock().map(|p| *p).ok()?;
        let world = self.world.lock().ok()?;
        state_getter::pointer_summary(&world, x, y).top_number
    }

    /// フレーム間隔から FPS を計算する内部ヘルパー。
    fn measure_fps(&self) -> f64 {
        let now = js_sys::Date::now();
        let mut last = match self.last_frame_ms.lock() {
            Ok(guard) => guard,
            Err(_) => return 0.0,
        };
        let fps = match *last {
            Some(previous) if now > previous => 1000.0 / (now - previous),
            _ => 0.0,
        };
        *last = Some(now);
        fps
    }
}

impl Default for CardTableApp {
    fn default() -> Self {
        Self::new()
    }
}
