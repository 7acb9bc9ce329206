// src/logic/pile.rs
//! 山 (パイル) グラフの走査プリミティブたち。
//!
//! カード同士の繋がりは `PileLink` コンポーネント（「真上に乗っているカード」への単一リンク）
//! だけで表現されていて、ここにあるのはそのリンクの森を歩くための純粋なクエリ関数だよ。
//! World を変更する関数はひとつもない！変更はぜんぶ `app::drag_apply_handler` の仕事。
//!
//! 走査はどれも visited セットかレジストリサイズで打ち切られるから、
//! 万一リンクデータが壊れて循環しても、フレームループが固まることは絶対にないよ。

use std::collections::HashSet;

use crate::components::PileLink;
use crate::ecs::entity::Entity;
use crate::ecs::world::World;

/// `start` から `PileLink` を **順方向** (上に乗っているカードの方向) にたどって
/// 届くカード全部のセットを返すよ。`start` 自身も必ず含まれる。
///
/// これが「掴んだカードと、その上に乗っている全部」＝ドラッグで一緒に動くチェーン！
/// 明示的なスタック（ワークリスト）と visited セットで回すから、
/// 循環したリンクがあっても同じIDを二度積まずに必ず終わる。👍
pub fn connected_set(world: &World, start: Entity) -> HashSet<Entity> {
    let mut linked_cards = HashSet::new();
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        linked_cards.insert(current);

        if let Some(link) = world.get_component::<PileLink>(current) {
            let next = link.linked_to;
            // まだ見てないIDで、ちゃんと実在するカードだけ積む。
            // レジストリとグラフがズレてた場合はそこで打ち切り（§エラー方針）。
            if !linked_cards.contains(&next) && world.is_entity_alive(next) {
                stack.push(next);
            }
        }
    }

    linked_cards
}

/// `card` を直接指している（＝`card` がその上に乗っている）カードを探すよ。
/// コミット済みの状態では、どのカードを指すリンクも高々1本だから、最初に見つかった1枚を返す。
pub fn parent_of(world: &World, card: Entity) -> Option<Entity> {
    world
        .get_all_entities_with_component::<PileLink>()
        .into_iter()
        .find(|&candidate| {
            world
                .get_component::<PileLink>(candidate)
                .map_or(false, |link| link.linked_to == card)
        })
}

/// `start` から順方向にたどって、山の **テール** (一番上、唯一の接続可能ポイント) を探すよ。
///
/// 止まる条件は4つ：
/// 1. リンクを持たないカードに着いた（これが普通のテール！）
/// 2. 次のリンク先が `dragged_origin` だった。ドラッグ中のチェーンに
///    踏み込む一歩手前で止まる（自分の山に自分を繋ぐのを防ぐガード！）
/// 3. 次のリンク先が既に訪問済みだった（循環ガード）
/// 4. 次のリンク先のIDが実在しなかった（最後に確認できたカードを返して短絡）
///
/// どのケースでも「最後に確認できた有効なカード」を返す、全域関数だよ。
pub fn find_tail(world: &World, start: Entity, dragged_origin: Option<Entity>) -> Entity {
    let mut current = start;
    let mut visited = HashSet::new();

    loop {
        visited.insert(current);

        let next = match world.get_component::<PileLink>(current) {
            Some(link) => link.linked_to,
            None => break, // リンクなし＝テール発見！
        };

        if Some(next) == dragged_origin {
            break; // 動いてるチェーンには踏み込まない！
        }
        if visited.contains(&next) {
            log::warn!("find_tail: cycle detected at {:?} -> {:?}, stopping", current, next);
            break;
        }
        if !world.is_entity_alive(next) {
            log::warn!("find_tail: dangling link {:?} -> {:?}, stopping", current, next);
            break;
        }

        current = next;
    }

    current
}

/// `leaf` から **逆方向** にたどって、山の **ルート** (一番下のカード) を探すよ。
/// 逆リンクのインデックスは持ってないから、1歩ごとに `parent_of` で線形スキャンする。
/// このスケールなら全然OK！走査はレジストリサイズで上限を切ってあるから、
/// 仮にリンクが壊れて輪になっていても必ず止まる。
pub fn find_root(world: &World, leaf: Entity) -> Entity {
    let mut current = leaf;
    let mut remaining = world.card_count();

    while remaining > 0 {
        match parent_of(world, current) {
            Some(parent) => current = parent,
            None => break, // 誰にも乗られていない＝ルート！
        }
        remaining -= 1;
    }

    current
}

/// `member` が属する山の全メンバーを、ルートからテールへの積み順で返すよ。
/// ホバープレビューのハイライト描画（山全体を縁取りする）専用のクエリ！
pub fn collect_pile(world: &World, member: Entity) -> Vec<Entity> {
    let root = find_root(world, member);
    let mut pile = vec![root];
    let mut seen: HashSet<Entity> = HashSet::new();
    seen.insert(root);

    let mut current = root;
    while let Some(link) = world.get_component::<PileLink>(current) {
        let next = link.linked_to;
        if seen.contains(&next) || !world.is_entity_alive(next) {
            break;
        }
        pile.push(next);
        seen.insert(next);
        current = next;
    }

    pile
}

/// `tail` に `origin`（ドラッグ中チェーンの根元）を繋いでいいかの判定だよ。
/// テールのリンク枠が空いているか、すでに `origin` を指している（＝同じ場所への
/// 置き直し。これはノーオペの再確認としてOK！）場合だけ合法。
pub fn can_attach(world: &World, tail: Entity, origin: Entity) -> bool {
    match world.get_component::<PileLink>(tail) {
        None => true,
        Some(link) => link.linked_to == origin,
    }
}
