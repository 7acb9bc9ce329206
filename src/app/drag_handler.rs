// src/app/drag_handler.rs
//! Handles card dragging logic (start and motion).

use log::info;

use crate::app::event_handler;
use crate::components::{DraggingInfo, Position};
use crate::ecs::entity::Entity;
use crate::ecs::world::World;
use crate::logic::pile;

/// 進行中のドラッグセッションだよ。
/// ポインタが押された時に生まれて、離された時に必ず死ぬ、フレームループ専属の短命な状態！
/// 持っているのは掴んだカード（＝動かすチェーンの根元）だけ。
/// どのカードが動いているかは各カードの `DraggingInfo` コンポーネントの有無で分かる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    /// ポインタ直下で掴んだカード。動かすチェーンの根元になる。
    pub origin: Entity,
}

/// ドラッグ開始時の処理 (ポインタ押下、ボタン以外の場所)。
///
/// 1. ポインタ直下の一番手前のカードを解決。いなければセッションは始まらない。
/// 2. そのカードから `connected_set` で動かすチェーン（掴んだカード＋上に乗ってる全部）を計算。
/// 3. チェーンをまるごと描画順の末尾へ昇格（ひとかたまりで一番手前に！）。
/// 4. 各メンバーに `DraggingInfo` (ポインタ − カード位置のオフセット) を付ける。
/// 5. セッションに根元カードを記録。
///
/// # 戻り値
/// セッションが始まったら `true`。空振りなら `false`（セッションはクリアされる）。
pub fn handle_drag_start(
    world: &mut World,
    session: &mut Option<DragSession>,
    x: f32,
    y: f32,
) -> bool {
    let origin = match event_handler::find_topmost_card_at(world, x, y) {
        Some(entity) => entity,
        None => {
            // 何も掴めなかった。セッションなしでおしまい！
            *session = None;
            return false;
        }
    };

    // 掴んだカードと、その上に乗っている全部が一緒に動く
    let moving = pile::connected_set(world, origin);
    info!("handle_drag_start: picked {:?}, moving chain of {} cards", origin, moving.len());

    // チェーンをまとめて一番手前へ（remove + append、相対順はそのまま）
    world.promote_to_top(&moving);

    // 各メンバーにポインタとのオフセットを記録。これで掴んだ位置関係のまま付いてくる！
    for &entity in &moving {
        match world.get_component::<Position>(entity).copied() {
            Some(pos) => {
                let dragging_info = DraggingInfo { offset_x: x - pos.x, offset_y: y - pos.y };
                world.add_component(entity, dragging_info);
            }
            None => log::error!("handle_drag_start: moving card {:?} has no Position", entity),
        }
    }

    *session = Some(DragSession { origin });
    true
}

/// ドラッグ中の位置更新 (ポインタ移動)。
/// `DraggingInfo` を持つ全カードを `ポインタ − オフセット` に動かすよ。
/// オフセットは掴んだ瞬間のものだから、チェーン全体が相対位置を保ったまま剛体移動する！
/// それ以外のカードには何もしない。
pub fn update_dragged_positions(world: &mut World, x: f32, y: f32) {
    // 先にオフセットを集めてから位置を書き換える (不変借用→可変借用の順！)
    let moving: Vec<(Entity, DraggingInfo)> = world
        .get_all_entities_with_component::<DraggingInfo>()
        .into_iter()
        .filter_map(|entity| {
            world.get_component::<DraggingInfo>(entity).map(|info| (entity, *info))
        })
        .collect();

    for (entity, info) in moving {
        if let Some(pos) = world.get_component_mut::<Position>(entity) {
            pos.x = x - info.offset_x;
            pos.y = y - info.offset_y;
        } else {
            log::error!("update_dragged_positions: dragged card {:?} has no Position", entity);
        }
    }
}

// --- テスト ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Card, CardColor, PileLink};
    use crate::config::layout::TOP_OFFSET;

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

    #[test]
    fn drag_start_on_empty_space_does_nothing() {
        let (mut world, e) = world_with_cards_at(&[(100.0, 100.0)]);
        let mut session = None;

        let started = handle_drag_start(&mut world, &mut session, 700.0, 700.0);
        assert!(!started, "空振りでセッションが始まっちゃった！");
        assert_eq!(session, None);
        assert!(world.get_component::<DraggingInfo>(e[0]).is_none());
        println!("空振りドラッグのテスト、成功！🎉");
    }

    #[test]
    fn drag_start_picks_whole_chain_and_promotes_it() {
        // 山: e0 の上に e1。さらにフリーの e2 が e0 たちの上に描画されている状態を作る。
        let (mut world, e) = world_with_cards_at(&[
            (100.0, 100.0),
            (100.0, 100.0 + TOP_OFFSET),
            (400.0, 400.0),
        ]);
        world.add_component(e[0], PileLink::new(e[1]));

        let mut session = None;
        // e0 の見えている帯 (e1 に覆われていない上端) を掴む
        let started = handle_drag_start(&mut world, &mut session, 110.0, 105.0);
        assert!(started);
        assert_eq!(session, Some(DragSession { origin: e[0] }));

        // チェーン両方に DraggingInfo が付いて、e2 には付かない
        assert!(world.get_component::<DraggingInfo>(e[0]).is_some());
        assert!(world.get_component::<DraggingInfo>(e[1]).is_some());
        assert!(world.get_component::<DraggingInfo>(e[2]).is_none());

        // チェーンが相対順そのままで一番手前に来ている
        assert_eq!(world.paint_order(), &[e[2], e[0], e[1]]);
        println!("チェーン掴みと昇格のテスト、成功！🎉");
    }

    #[test]
    fn picking_a_mid_pile_card_lifts_only_the_cards_above() {
        // 山: e0 → e1 → e2 (e2 が一番上)
        let (mut world, e) = world_with_cards_at(&[
            (100.0, 100.0),
            (100.0, 100.0 + TOP_OFFSET),
            (100.0, 100.0 + TOP_OFFSET * 2.0),
        ]);
        world.add_component(e[0], PileLink::new(e[1]));
        world.add_component(e[1], PileLink::new(e[2]));

        let mut session = None;
        // e1 の見えている帯を掴む → e1 と e2 だけが動く
        let started = handle_drag_start(&mut world, &mut session, 110.0, 100.0 + TOP_OFFSET + 1.0);
        assert!(started);
        assert_eq!(session, Some(DragSession { origin: e[1] }));
        assert!(world.get_component::<DraggingInfo>(e[0]).is_none(), "山の下半分は動かない！");
        assert!(world.get_component::<DraggingInfo>(e[1]).is_some());
        assert!(world.get_component::<DraggingInfo>(e[2]).is_some());
        println!("山の途中掴みのテスト、成功！🎉");
    }

    #[test]
    fn dragged_chain_translates_rigidly() {
        let (mut world, e) = world_with_cards_at(&[
            (100.0, 100.0),
            (100.0, 100.0 + TOP_OFFSET),
            (400.0, 400.0),
        ]);
        world.add_component(e[0], PileLink::new(e[1]));

        let mut session = None;
        assert!(handle_drag_start(&mut world, &mut session, 110.0, 105.0));

        // ポインタを (+200, +50) 動かす
        update_dragged_positions(&mut world, 310.0, 155.0);

        let p0 = *world.get_component::<Position>(e[0]).unwrap();
        let p1 = *world.get_component::<Position>(e[1]).unwrap();
        let p2 = *world.get_component::<Position>(e[2]).unwrap();

        // チェーンはまるごと平行移動、相対オフセットは維持
        assert_eq!((p0.x, p0.y), (300.0, 150.0));
        assert_eq!((p1.x, p1.y), (300.0, 150.0 + TOP_OFFSET));
        // 動かしていないカードはそのまま
        assert_eq!((p2.x, p2.y), (400.0, 400.0));
        println!("剛体移動のテスト、成功！🎉");
    }
}
