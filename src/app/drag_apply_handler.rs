// src/app/drag_apply_handler.rs
//! Handles applying the consequences of releasing a dragged chain
//! (the drop resolution: unlink, find target, validate, commit or cancel).

use log::info;

use crate::app::drag_handler::DragSession;
use crate::components::{DraggingInfo, PileLink, Position};
use crate::config::layout::TOP_OFFSET;
use crate::ecs::entity::Entity;
use crate::ecs::world::World;
use crate::logic::pile;

/// ドラッグ終了時の処理 (ポインタ解放、セッションあり)。
///
/// # 処理の流れ
/// 1. 動かしているチェーンを根元から再計算（念のためドロップ時点でもう一度！）
/// 2. **切り離し**: 根元を指しているカード（高々1枚）の `PileLink` を外して、
///    チェーンを元いた山から自由にする
/// 3. **候補探し**: 解放地点の下にある、動かしていないカードのうち一番手前のものを探す
/// 4. 候補の山を `find_tail` で根元ガード付きで歩いて、本当の接続先 (テール) を出す。
///    接続は必ず山のテールに対して行う。途中に割り込みはナシ！
/// 5. **検証**: テールのリンク枠が空いているか、既に根元を指している（置き直し）場合だけ合法
/// 6. **コミット**: 合法なら `テール.PileLink = 根元` を挿入して、動かしたカードを
///    テールの位置から `TOP_OFFSET` 刻みで積み直す（扇状の見た目！）
/// 7. 合法な相手がいなければ、チェーンはドロップ地点に未接続のまま置かれる（これも正常な結果！）
/// 8. どっちの結果でも、`DraggingInfo` を全部剥がしてセッションを終える
pub fn handle_drag_end(world: &mut World, session: &mut Option<DragSession>, x: f32, y: f32) {
    let Some(DragSession { origin }) = session.take() else {
        // セッションが無いのに呼ばれた。何もしないでリターン。
        return;
    };
    info!("handle_drag_end: releasing chain rooted at {:?} at ({}, {})", origin, x, y);

    // --- 1. 動かしているチェーンを再計算 ---
    let moving = pile::connected_set(world, origin);

    // --- 2. 元の親から切り離し ---
    if let Some(previous_parent) = pile::parent_of(world, origin) {
        world.remove_component::<PileLink>(previous_parent);
        info!("  - Unlinked previous parent {:?}", previous_parent);
    }
    // ここからは根元がチェーンの正真正銘のルートのはず。
    debug_assert!(
        pile::parent_of(world, origin).is_none(),
        "drag origin must be the root of its chain after the unlink step"
    );

    // --- 3. ドロップ先の候補を探す (動かしているカードは除外！) ---
    let candidate = find_drop_candidate(world, &moving, x, y);

    // --- 4-6. テール解決 → 検証 → コミット ---
    let mut committed = false;
    if let Some(candidate) = candidate {
        let tail = pile::find_tail(world, candidate, Some(origin));
        if pile::can_attach(world, tail, origin) {
            world.add_component(tail, PileLink::new(origin));
            restack_moving_chain(world, origin, tail);
            info!("  - Linked {:?} onto tail {:?}", origin, tail);
            committed = true;
        } else {
            info!("  - Tail {:?} already occupied, drop rejected", tail);
        }
    }
    if !committed {
        // 合法な相手なし。チェーンはその場に未接続で残る（フリーのルートになる）。
        info!("  - No valid target, chain stays loose at the drop position");
    }

    // --- 8. ドラッグフラグの掃除とセッション終了 ---
    clear_dragging_flags(world);
    // session は先頭の take() で既に None！
}

/// 解放地点の下にある「動かしていない」カードのうち一番手前のものを探すヘルパー。
/// 描画順を末尾（手前）から走査するよ。動かしているチェーンは自分自身への
/// ドロップ候補にならない。これが「自分の山に自分を重ねる」のを防ぐ一段目のガード！
fn find_drop_candidate(
    world: &World,
    moving: &std::collections::HashSet<Entity>,
    x: f32,
    y: f32,
) -> Option<Entity> {
    crate::app::event_handler::cards_at(world, x, y)
        .into_iter()
        .rev() // cards_at は奥→手前の順なので、逆から見る
        .find(|entity| !moving.contains(entity))
}

/// コミット成立後、動かしたチェーンの物理位置をテールの上に積み直すよ。
/// 根元がオフセット1個分、その上のカードが2個分…と、チェーンの順方向の並びで
/// `TOP_OFFSET` ずつ下にずらして置く。これで各カードの番号帯が見える扇状の山になる！
fn restack_moving_chain(world: &mut World, origin: Entity, tail: Entity) {
    let Some(base) = world.get_component::<Position>(tail).copied() else {
        log::error!("restack_moving_chain: tail {:?} has no Position", tail);
        return;
    };

    // チェーンを根元から順方向に歩く。walk は接続コミット後なので
    // origin ガードは不要だけど、循環ガードはここでも効かせておく。
    let mut current = origin;
    let mut seen = std::collections::HashSet::new();
    let mut stacking_index: usize = 1; // 1始まり！根元が TOP_OFFSET * 1
    loop {
        if let Some(pos) = world.get_component_mut::<Position>(current) {
            pos.x = base.x;
            pos.y = base.y + TOP_OFFSET * stacking_index as f32;
        }
        seen.insert(current);

        let next = match world.get_component::<PileLink>(current) {
            Some(link) => link.linked_to,
            None => break,
        };
        if seen.contains(&next) || !world.is_entity_alive(next) {
            break;
        }
        current = next;
        stacking_index += 1;
    }
}

/// 全カードの `DraggingInfo` を剥がす。成功でも失敗でもセッションの最後に必ず呼ばれるよ。🧹
fn clear_dragging_flags(world: &mut World) {
    for entity in world.get_all_entities_with_component::<DraggingInfo>() {
        world.remove_component::<DraggingInfo>(entity);
    }
}

// --- テスト ---
// ドロップ解決はこのエンジンの心臓部なので、仕様のシナリオをそのまま流すテストを置くよ。
#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::drag_handler::{self, DragSession};
    use crate::components::{Card, CardColor};
    use std::collections::HashSet;

    fn world_with_cards_at(positions: &[(f32, f32)]) -> (World, Vec<Entity>) {
        let mut world = World::new();
        world.register_component::<Card>();
        world.register_component::<Position>();
        world.register_component::<PileLink>();
        world.register_component::<DraggingInfo>();

        let mut entities = Vec::new();
        for &(x, y) in positions {
            let entity = world.create_entity();
            world.add_component(
                entity,
                Card { number: entity.card_number(), color: CardColor { r: 99, g: 99, b: 99 } },
            );
            world.add_component(entity, Position { x, y });
            entities.push(entity);
        }
        (world, entities)
    }

    // ドラッグ開始→移動→解放を一息でやるテスト用ヘルパー
    fn drag_and_drop(world: &mut World, from: (f32, f32), to: (f32, f32)) {
        let mut session = None;
        assert!(
            drag_handler::handle_drag_start(world, &mut session, from.0, from.1),
            "テストのドラッグ開始が空振りした！座標を確認して！"
        );
        drag_handler::update_dragged_positions(world, to.0, to.1);
        handle_drag_end(world, &mut session, to.0, to.1);
        assert_eq!(session, None, "セッションが終了していない！");
    }

    fn linked_to(world: &World, entity: Entity) -> Option<Entity> {
        world.get_component::<PileLink>(entity).map(|l| l.linked_to)
    }

    // 仕様の3枚シナリオ: A(1) を B(2) に、C(3) を A に落とす。
    #[test]
    fn scenario_three_cards_build_a_pile() {
        let (mut world, e) = world_with_cards_at(&[
            (100.0, 100.0), // A
            (300.0, 100.0), // B
            (500.0, 100.0), // C
        ]);
        let (a, b, c) = (e[0], e[1], e[2]);

        // A を掴んで B の上へ
        drag_and_drop(&mut world, (110.0, 110.0), (310.0, 110.0));
        // 接続は「B が A を指す」向き (B の上に A が乗った)
        assert_eq!(linked_to(&world, b), Some(a), "B.linked_to は A のはず！");
        assert_eq!(linked_to(&world, a), None);
        // A を掴んでも下の B は付いてこない
        assert_eq!(pile::connected_set(&world, a), [a].into_iter().collect());
        // でも B から見れば A は山の仲間
        assert_eq!(pile::connected_set(&world, b), [a, b].into_iter().collect());
        // A の物理位置は B から TOP_OFFSET ずれた場所
        let pa = world.get_component::<Position>(a).unwrap();
        let pb = world.get_component::<Position>(b).unwrap();
        assert_eq!((pa.x, pa.y), (pb.x, pb.y + TOP_OFFSET));

        // C を掴んで A (山のテール) の上へ
        let pa = *world.get_component::<Position>(a).unwrap();
        drag_and_drop(&mut world, (510.0, 110.0), (pa.x + 5.0, pa.y + 5.0));

        // 最終形: B→A→C の山 (B が一番下、C が一番上)
        assert_eq!(linked_to(&world, b), Some(a));
        assert_eq!(linked_to(&world, a), Some(c), "A.linked_to は C のはず！");
        assert_eq!(linked_to(&world, c), None);
        assert_eq!(pile::connected_set(&world, b), [a, b, c].into_iter().collect());
        assert_eq!(pile::find_tail(&world, b, None), c);
        assert_eq!(pile::find_root(&world, c), b);
        println!("3枚シナリオのテスト、成功！🎉");
    }

    // 山の途中にドロップしても、接続は必ずテールに付く。
    #[test]
    fn dropping_onto_a_pile_member_attaches_at_the_tail() {
        let (mut world, e) = world_with_cards_at(&[
            (100.0, 100.0),
            (100.0, 100.0 + TOP_OFFSET),
            (500.0, 400.0),
        ]);
        // 山: e0 → e1 (e1 がテール)
        world.add_component(e[0], PileLink::new(e[1]));

        // e2 を e0 (山のルートの見えている帯) の上に落とす
        drag_and_drop(&mut world, (510.0, 410.0), (110.0, 105.0));

        // 接続先は e0 じゃなくてテールの e1！
        assert_eq!(linked_to(&world, e[1]), Some(e[2]), "テールに繋がるはず！");
        assert_eq!(linked_to(&world, e[0]), Some(e[1]), "既存の山は変わらない！");
        println!("テール接続のテスト、成功！🎉");
    }

    // 2枚チェーンを自分自身の上に落としても繋がらない。
    #[test]
    fn dropping_a_chain_onto_itself_is_rejected() {
        let (mut world, e) = world_with_cards_at(&[(100.0, 100.0), (100.0, 100.0 + TOP_OFFSET)]);
        world.add_component(e[0], PileLink::new(e[1]));

        // e0 を掴んで（e1 も付いてくる）、チェーン自身の真上で離す
        let mut session = None;
        assert!(drag_handler::handle_drag_start(&mut world, &mut session, 110.0, 105.0));
        handle_drag_end(&mut world, &mut session, 110.0, 105.0 + TOP_OFFSET);

        // 候補が全部 moving なので対象なし。チェーンはそのまま、リンクも元のまま。
        assert_eq!(linked_to(&world, e[0]), Some(e[1]));
        assert_eq!(pile::parent_of(&world, e[0]), None, "誰にも繋がっていないはず");
        // フラグは綺麗に掃除されている
        assert!(world.get_all_entities_with_component::<DraggingInfo>().is_empty());
        println!("自己ドロップ拒否のテスト、成功！🎉");
    }

    // 同じテールへの置き直しはノーオペの再確認。
    #[test]
    fn redropping_onto_the_same_tail_is_idempotent() {
        let (mut world, e) = world_with_cards_at(&[(100.0, 100.0), (400.0, 400.0)]);

        // e1 を e0 に乗せる
        drag_and_drop(&mut world, (410.0, 410.0), (110.0, 110.0));
        assert_eq!(linked_to(&world, e[0]), Some(e[1]));
        let first_pos = *world.get_component::<Position>(e[1]).unwrap();

        // もう一度 e1 を掴んで、e0 の（見えている帯の）上でそのまま離す
        drag_and_drop(&mut world, (first_pos.x + 5.0, first_pos.y + 5.0), (105.0, 105.0));

        // リンクは変わらず、エラーもなく、位置も同じ積み直し結果
        assert_eq!(linked_to(&world, e[0]), Some(e[1]), "再ドロップでリンクが変わった！");
        let second_pos = *world.get_component::<Position>(e[1]).unwrap();
        assert_eq!(first_pos, second_pos);
        println!("再ドロップ冪等性のテスト、成功！🎉");
    }

    // 空振りドロップでチェーンは未接続のままその場に残る。
    #[test]
    fn dropping_on_empty_space_leaves_the_chain_loose() {
        let (mut world, e) = world_with_cards_at(&[(100.0, 100.0), (400.0, 400.0)]);
        // e1 を e0 に乗せてから、まとめて何もない場所へ
        drag_and_drop(&mut world, (410.0, 410.0), (110.0, 110.0));

        // e0 (ルート) を掴むと e1 も付いてくる
        drag_and_drop(&mut world, (105.0, 105.0), (700.0, 600.0));

        // 切り離しステップで e0 への親リンクは…元々ないけど、e0→e1 のリンクは保たれる
        assert_eq!(linked_to(&world, e[0]), Some(e[1]), "チェーン内部のリンクは残るはず！");
        assert_eq!(pile::parent_of(&world, e[0]), None);
        // ドロップ地点に置かれている (ドラッグ中の位置のまま)
        let p0 = world.get_component::<Position>(e[0]).unwrap();
        assert_eq!((p0.x, p0.y), (695.0, 595.0));
        println!("空振りドロップのテスト、成功！🎉");
    }

    // 別の山から引き剥がして新しい山に付け替える。
    #[test]
    fn moving_a_subchain_between_piles_relinks_cleanly() {
        let (mut world, e) = world_with_cards_at(&[
            (100.0, 100.0),
            (100.0, 100.0 + TOP_OFFSET),
            (100.0, 100.0 + TOP_OFFSET * 2.0),
            (600.0, 400.0),
        ]);
        // 山: e0 → e1 → e2。e3 はフリー。
        world.add_component(e[0], PileLink::new(e[1]));
        world.add_component(e[1], PileLink::new(e[2]));

        // e1 の帯を掴んで (e2 も付いてくる)、e3 の上へ
        drag_and_drop(&mut world, (110.0, 100.0 + TOP_OFFSET + 1.0), (610.0, 410.0));

        // e0 は切り離されてテールに戻り、e3 → e1 → e2 の新しい山ができる
        assert_eq!(linked_to(&world, e[0]), None, "元の山から切り離されるはず！");
        assert_eq!(linked_to(&world, e[3]), Some(e[1]));
        assert_eq!(linked_to(&world, e[1]), Some(e[2]));
        assert_eq!(pile::find_tail(&world, e[3], None), e[2]);

        // 積み直しの物理位置も確認 (e1 が +1、e2 が +2 オフセット)
        let p3 = *world.get_component::<Position>(e[3]).unwrap();
        let p1 = *world.get_component::<Position>(e[1]).unwrap();
        let p2 = *world.get_component::<Position>(e[2]).unwrap();
        assert_eq!((p1.x, p1.y), (p3.x, p3.y + TOP_OFFSET));
        assert_eq!((p2.x, p2.y), (p3.x, p3.y + TOP_OFFSET * 2.0));
        println!("山の付け替えテスト、成功！🎉");
    }

    // たくさんドロップを繰り返しても不変条件が守られる。
    #[test]
    fn invariants_hold_after_a_burst_of_drops() {
        let (mut world, e) = world_with_cards_at(&[
            (100.0, 100.0),
            (250.0, 100.0),
            (400.0, 100.0),
            (550.0, 100.0),
            (700.0, 100.0),
        ]);

        // 適当な順でくっつけていく
        drag_and_drop(&mut world, (110.0, 110.0), (260.0, 110.0)); // e0 → e1 の上
        drag_and_drop(&mut world, (410.0, 110.0), (560.0, 110.0)); // e2 → e3 の上
        // e1 の山 (e1, e0) を e3 の山のテールへ
        let p0 = *world.get_component::<Position>(e[0]).unwrap();
        drag_and_drop(&mut world, (p0.x + 5.0, p0.y + 5.0), (705.0, 110.0)); // 実は e4 の上
        // e4 の山を e3 の山へ
        let p4 = *world.get_component::<Position>(e[4]).unwrap();
        drag_and_drop(&mut world, (p4.x + 5.0, p4.y + 2.0), (560.0, 110.0));

        // 不変条件 1: 自己リンクなし
        for &entity in world.paint_order() {
            assert_ne!(linked_to(&world, entity), Some(entity), "自己リンク発見！");
        }

        // 不変条件 2: どのカードから歩いてもレジストリサイズ以内でテールに到達 (非循環)
        for &entity in world.paint_order() {
            let tail = pile::find_tail(&world, entity, None);
            assert!(world.is_entity_alive(tail));
            let set = pile::connected_set(&world, entity);
            assert!(set.len() <= world.card_count());
        }

        // 不変条件 3: 各カードを指すリンクは高々1本
        let mut pointed_at: Vec<Entity> = world
            .get_all_entities_with_component::<PileLink>()
            .into_iter()
            .map(|entity| linked_to(&world, entity).unwrap())
            .collect();
        let unique: HashSet<Entity> = pointed_at.iter().copied().collect();
        pointed_at.sort();
        assert_eq!(unique.len(), pointed_at.len(), "同じカードに2本のリンクが刺さってる！");

        // 不変条件 4: ドラッグフラグは残っていない
        assert!(world.get_all_entities_with_component::<DraggingInfo>().is_empty());
        println!("連続ドロップ不変条件のテスト、成功！🎉");
    }
}
