// src/app/renderer.rs
//! CardTableApp の描画関連ロジック。
//! World の状態を毎フレーム Canvas に描くよ。描画はここだけ、状態変更は一切しない！

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::app::hover_handler::HoverPreview;
use crate::app::state_getter::PointerSummary;
use crate::components::{Card, DraggingInfo, Position};
use crate::config::layout::{
    BUTTON_HEIGHT, BUTTON_INSET, BUTTON_WIDTH, BUTTON_X, BUTTON_Y, CARD_HEIGHT, CARD_WIDTH,
    DIAG_TEXT_X, FPS_TEXT_X, FPS_TEXT_Y,
};
use crate::ecs::world::World;

// --- 描画で使う色・スタイル ---
const BACKGROUND_COLOR: &str = "rgb(128, 128, 128)"; // テーブルのグレー
const BUTTON_OUTER_COLOR: &str = "rgb(0, 0, 0)";
const BUTTON_INNER_COLOR: &str = "rgb(128, 128, 128)";
const TEXT_COLOR: &str = "rgb(255, 255, 255)";
const DIAG_TEXT_COLOR: &str = "rgb(0, 0, 0)";
const OUTLINE_COLOR: &str = "rgb(255, 255, 255)";
const CARD_FONT: &str = "24px sans-serif";
const DIAG_FONT: &str = "24px sans-serif";
/// ドラッグ中カードの不透明度 (255分の180、だいたい7割)
const DRAGGING_ALPHA: f64 = 0.7;
/// プレビューの縁取り: テールは太く、山の他のメンバーは細く
const OUTLINE_WIDTH_TAIL: f64 = 3.0;
const OUTLINE_WIDTH_PILE: f64 = 1.0;

/// Rust側で Canvas にテーブル全体を描画する関数。
///
/// 描く順番が大事！ 背景 → ボタン → カード (描画順レジストリの並びそのまま、
/// 末尾が最後に描かれて一番手前に見える) → 診断テキスト。
pub fn render_table(
    world: &World,
    preview: &Option<HoverPreview>,
    summary: &PointerSummary,
    fps: f64,
    canvas: &HtmlCanvasElement,
    context: &CanvasRenderingContext2d,
) -> Result<(), JsValue> {
    // --- ステップ1: Canvas 寸法を取得してクリア ---
    let canvas_width = canvas.width() as f64;
    let canvas_height = canvas.height() as f64;
    context.clear_rect(0.0, 0.0, canvas_width, canvas_height);
    context.set_fill_style_str(BACKGROUND_COLOR);
    context.fill_rect(0.0, 0.0, canvas_width, canvas_height);

    // --- ステップ2: 追加ボタン ---
    draw_button(context)?;

    // --- ステップ3: カードを描画順に描く ---
    for &entity in world.paint_order() {
        let (Some(card), Some(pos)) = (
            world.get_component::<Card>(entity),
            world.get_component::<Position>(entity),
        ) else {
            log::warn!("render_table: skipping {:?}, Card or Position missing", entity);
            continue;
        };

        let dragging = world.get_component::<DraggingInfo>(entity).is_some();

        // プレビュー対象なら縁取りの太さが決まる (テールだけ太枠！)
        let outline_width = match preview {
            Some(p) if p.tail == entity => Some(OUTLINE_WIDTH_TAIL),
            Some(p) if p.pile.contains(&entity) => Some(OUTLINE_WIDTH_PILE),
            _ => None,
        };

        draw_card(context, pos, &card.color.to_css(), card.number, dragging, outline_width)?;
    }

    // --- ステップ4: 診断テキスト ---
    draw_diagnostics(context, summary, fps, canvas_height)?;

    Ok(())
}

/// 「Add Card」ボタンを描くよ。黒い外枠とグレーの内側、白文字の2層構成！
fn draw_button(context: &CanvasRenderingContext2d) -> Result<(), JsValue> {
    context.set_fill_style_str(BUTTON_OUTER_COLOR);
    context.fill_rect(BUTTON_X as f64, BUTTON_Y as f64, BUTTON_WIDTH as f64, BUTTON_HEIGHT as f64);

    context.set_fill_style_str(BUTTON_INNER_COLOR);
    context.fill_rect(
        (BUTTON_X + BUTTON_INSET) as f64,
        (BUTTON_Y + BUTTON_INSET) as f64,
        (BUTTON_WIDTH - BUTTON_INSET * 2.0) as f64,
        (BUTTON_HEIGHT - BUTTON_INSET * 2.0) as f64,
    );

    context.set_fill_style_str(TEXT_COLOR);
    context.set_font(DIAG_FONT);
    context.set_text_align("center");
    context.set_text_baseline("middle");
    context.fill_text(
        "Add Card",
        (BUTTON_X + BUTTON_WIDTH / 2.0) as f64,
        (BUTTON_Y + BUTTON_HEIGHT / 2.0) as f64,
    )?;
    Ok(())
}

/// カード1枚を描くよ。本体の矩形、中央の番号、必要ならドラッグ中の半透明と縁取り。
fn draw_card(
    context: &CanvasRenderingContext2d,
    pos: &Position,
    css_color: &str,
    number: usize,
    dragging: bool,
    outline_width: Option<f64>,
) -> Result<(), JsValue> {
    if dragging {
        context.set_global_alpha(DRAGGING_ALPHA);
    }

    // 本体
    context.set_fill_style_str(css_color);
    context.fill_rect(pos.x as f64, pos.y as f64, CARD_WIDTH as f64, CARD_HEIGHT as f64);

    // 番号 (カード中央に白文字)
    context.set_fill_style_str(TEXT_COLOR);
    context.set_font(CARD_FONT);
    context.set_text_align("center");
    context.set_text_baseline("middle");
    context.fill_text(
        &number.to_string(),
        (pos.x + CARD_WIDTH / 2.0) as f64,
        (pos.y + CARD_HEIGHT / 2.0) as f64,
    )?;

    if dragging {
        context.set_global_alpha(1.0); // 後続の描画のために戻すのを忘れずに！
    }

    // プレビューの縁取りは不透明で上から描く
    if let Some(width) = outline_width {
        context.set_stroke_style_str(OUTLINE_COLOR);
        context.set_line_width(width);
        context.stroke_rect(pos.x as f64, pos.y as f64, CARD_WIDTH as f64, CARD_HEIGHT as f64);
    }

    Ok(())
}

/// 画面の隅っこの診断テキスト。FPS は右上、ポインタ情報は左下に積むよ。
fn draw_diagnostics(
    context: &CanvasRenderingContext2d,
    summary: &PointerSummary,
    fps: f64,
    canvas_height: f64,
) -> Result<(), JsValue> {
    context.set_fill_style_str(DIAG_TEXT_COLOR);
    context.set_font(DIAG_FONT);
    context.set_text_align("left");
    context.set_text_baseline("alphabetic");

    context.fill_text(&format!("FPS: {:.1}", fps), FPS_TEXT_X as f64, FPS_TEXT_Y as f64)?;

    if summary.is_over_anything() {
        let linked_text = match summary.linked_number {
            Some(number) => format!("Linked card: {}", number),
            None => "Linked card: None".to_string(),
        };
        let top_text = match summary.top_number {
            Some(number) => format!("Top card: {}", number),
            None => "Top card: None".to_string(),
        };

        context.fill_text(
            &format!("Mouse over card: {}", summary.over_numbers_text()),
            DIAG_TEXT_X as f64,
            canvas_height - 40.0,
        )?;
        context.fill_text(&top_text, DIAG_TEXT_X as f64, canvas_height - 80.0)?;
        context.fill_text(&linked_text, DIAG_TEXT_X as f64, canvas_height - 120.0)?;
    }

    Ok(())
}
