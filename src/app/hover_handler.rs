// src/app/hover_handler.rs
//! ドラッグ中の「いまここで離したらどうなる？」を毎フレーム計算するロジックだよ。
//!
//! ドロップ解決 (`drag_apply_handler`) と **同じ** 候補探し・テール歩き・検証を、
//! World を一切変更せずにやって、結果をハイライト描画用に返すだけ！
//! だからプレビューで光った場所に落とせば、必ずその通りにコミットされる。✨

use crate::app::event_handler;
use crate::ecs::entity::Entity;
use crate::ecs::world::World;
use crate::logic::pile;

/// ホバープレビューの計算結果だよ。レンダラがこれを見て山を縁取りする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverPreview {
    /// 実際の接続先になるテール。太枠で強調表示！
    pub tail: Entity,
    /// 接続先の山の全メンバー (ルート→テール順)。細枠で表示。
    pub pile: Vec<Entity>,
}

/// セッション中の毎フレーム呼ばれる、変更なしのドロップ先プレビュー計算。
///
/// # 戻り値
/// * `Some(HoverPreview)` : ポインタ直下に合法な接続先がある場合。
/// * `None` : 接続先なし (空振り中、または相手の山が埋まってる場合)。
pub fn compute_hover_preview(
    world: &World,
    origin: Entity,
    x: f32,
    y: f32,
) -> Option<HoverPreview> {
    // 動かしているチェーンは接続先候補にならない
    let moving = pile::connected_set(world, origin);

    // ポインタ直下の一番手前の「動いていない」カード
    let candidate = event_handler::cards_at(world, x, y)
        .into_iter()
        .rev()
        .find(|entity| !moving.contains(entity))?;

    // ドロップ時と同じテール解決 (根元ガード付き！)
    let tail = pile::find_tail(world, candidate, Some(origin));

    // ドロップ時と同じ検証
    if !pile::can_attach(world, tail, origin) {
        return None;
    }

    // 接続先の山をまるごと集めてハイライト対象にする。
    // チェーンの元いた場所でホバーしている時は、まだ切り離し前だから
    // 動かしている自分たちも山の一部として光る (ドロップ時の見た目と同じ！)。
    let pile = pile::collect_pile(world, tail);

    Some(HoverPreview { tail, pile })
}
