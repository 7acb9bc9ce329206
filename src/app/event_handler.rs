// src/app/event_handler.rs
//! ユーザー入力イベントの解決ロジック。ポインタ座標から
//! 「何がクリック/ホバーされたのか」を特定する純粋クエリたちだよ。

use crate::components::Position;
use crate::config::layout::{
    BUTTON_HEIGHT, BUTTON_INSET, BUTTON_WIDTH, BUTTON_X, BUTTON_Y, CARD_HEIGHT, CARD_WIDTH,
};
use crate::ecs::entity::Entity;
use crate::ecs::world::World;

/// クリックされた要素の種類を表す Enum だよ！
/// カードがクリックされたのか、それとも「Add Card」ボタンがクリックされたのかを示すんだ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)] // デバッグ表示、コピー、比較ができるようにするおまじない✨
pub enum ClickTarget {
    /// カードがクリックされた場合。どのカードか (Entity) を保持するよ。
    Card(Entity),
    /// カード追加ボタンがクリックされた場合。
    AddButton,
}

/// クリックされた座標 (x, y) に基づいて、どの要素 (ボタン or カード) が
/// クリックされたかを特定する関数だよ！
///
/// ボタンの判定が先！ボタンの上にカードが流れてきていても、ボタンが勝つよ。
/// カードは描画順 (paint order) の **末尾から** 走査して、一番手前のものを選ぶ。
///
/// # 戻り値
/// * `Some(ClickTarget::AddButton)` : ボタンの内側矩形がクリックされた場合。
/// * `Some(ClickTarget::Card(entity))` : 一番手前のカードがクリックされた場合。
/// * `None`: 何もクリックされなかった場合 (背景など)。
pub fn find_clicked_element(world: &World, x: f32, y: f32) -> Option<ClickTarget> {
    // --- 1. ボタンの判定 ---
    // 当たり判定は内側矩形 (外枠から BUTTON_INSET だけ縮めたもの) で取るよ。
    if is_point_in_rect(
        x,
        y,
        (
            BUTTON_X + BUTTON_INSET,
            BUTTON_Y + BUTTON_INSET,
            BUTTON_WIDTH - BUTTON_INSET * 2.0,
            BUTTON_HEIGHT - BUTTON_INSET * 2.0,
        ),
    ) {
        log::info!("find_clicked_element: hit the add-card button");
        return Some(ClickTarget::AddButton);
    }

    // --- 2. カードの判定 ---
    find_topmost_card_at(world, x, y).map(ClickTarget::Card)
}

/// 座標 (x, y) に存在するカードのうち、最も手前にあるものを探すよ。
///
/// Zオーダー＝レジストリの並び（末尾が一番手前）だから、
/// `paint_order` を **逆順に** 走査して最初にヒットしたカードがそれ！
/// これはただのクエリで、World は一切変更しない。マウスオーバー表示と
/// ドラッグの掴み先の両方がこの関数で決まるよ。
pub fn find_topmost_card_at(world: &World, x: f32, y: f32) -> Option<Entity> {
    world
        .paint_order()
        .iter()
        .rev()
        .copied()
        .find(|&entity| card_contains_point(world, entity, x, y))
}

/// 座標 (x, y) の下にあるカードを **全部** 、奥から手前の順で返すよ。
/// 画面下の「Mouse over card: [...]」診断表示で使うやつ！
pub fn cards_at(world: &World, x: f32, y: f32) -> Vec<Entity> {
    world
        .paint_order()
        .iter()
        .copied()
        .filter(|&entity| card_contains_point(world, entity, x, y))
        .collect()
}

/// カードの矩形 (Position + 固定サイズ) が点を含むかどうか。
/// Position が無いエンティティは当たらない扱い (このデモでは全エンティティが持つはずだけど、念のため！)。
fn card_contains_point(world: &World, entity: Entity, x: f32, y: f32) -> bool {
    match world.get_component::<Position>(entity) {
        Some(pos) => is_point_in_rect(x, y, (pos.x, pos.y, CARD_WIDTH, CARD_HEIGHT)),
        None => false,
    }
}

/// 座標が矩形内にあるかチェックするヘルパー。
/// 矩形は (左上のX, 左上のY, 幅, 高さ) のタプルで表現するよ。
fn is_point_in_rect(px: f32, py: f32, rect: (f32, f32, f32, f32)) -> bool {
    let (rx, ry, rw, rh) = rect;
    px >= rx && px < rx + rw && py >= ry && py < ry + rh
}
