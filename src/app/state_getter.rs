// src/app/state_getter.rs
//! Gets the current table state from the World and converts it to JSON,
//! plus the small pointer summaries shown as on-canvas diagnostic text.

use std::sync::{Arc, Mutex};

use itertools::Itertools;
use log::{error, info};
use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::app::event_handler;
use crate::components::{Card, CardColor, DraggingInfo, PileLink, Position};
use crate::ecs::entity::Entity;
use crate::ecs::world::World;

/// カード1枚分のスナップショットだよ。JS 側やデバッグ出力にそのまま渡せる形！
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CardSnapshot {
    pub entity: Entity,
    pub number: usize,
    pub color: CardColor,
    pub x: f32,
    pub y: f32,
    /// このカードの真上に乗っているカードの番号 (いなければ None)
    pub linked_to: Option<usize>,
    /// いままさにドラッグされているか (描画側は半透明ヒントとして使う)
    pub dragging: bool,
}

/// テーブル全体のスナップショット。描画順 (番号のリスト) も一緒に持つよ。
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TableSnapshot {
    pub cards: Vec<CardSnapshot>,
    /// 描画順のカード番号。先頭が一番奥、末尾が一番手前！
    pub paint_order: Vec<usize>,
}

/// World からスナップショットを組み立てる純粋関数だよ。
/// カードは描画順で並べるから、JS 側はこの順で描くだけでいい！
pub fn snapshot_table(world: &World) -> TableSnapshot {
    let mut cards = Vec::with_capacity(world.card_count());
    for &entity in world.paint_order() {
        let (Some(card), Some(pos)) = (
            world.get_component::<Card>(entity),
            world.get_component::<Position>(entity),
        ) else {
            log::warn!("snapshot_table: {:?} is missing Card or Position, skipping", entity);
            continue;
        };
        cards.push(CardSnapshot {
            entity,
            number: card.number,
            color: card.color,
            x: pos.x,
            y: pos.y,
            linked_to: world
                .get_component::<PileLink>(entity)
                .map(|link| link.linked_to.card_number()),
            dragging: world.get_component::<DraggingInfo>(entity).is_some(),
        });
    }

    let paint_order = world.paint_order().iter().map(|e| e.card_number()).collect();
    TableSnapshot { cards, paint_order }
}

/// テーブルの状態を取得し、JSON 文字列として返します。
/// (JS 側のデバッグパネルがポーリングする用)
pub fn get_table_state_json(world_arc: &Arc<Mutex<World>>) -> Result<JsValue, JsValue> {
    let world = match world_arc.try_lock() {
        Ok(w) => w,
        Err(e) => {
            let error_msg = format!("Failed to lock world for getting state: {}", e);
            error!("{}", error_msg);
            // JS 側にエラーを返す方が親切
            return Err(JsValue::from_str(&error_msg));
        }
    };

    let snapshot = snapshot_table(&world);
    info!("Collected snapshot of {} cards.", snapshot.cards.len());

    match serde_json::to_string(&snapshot) {
        Ok(json_string) => Ok(JsValue::from_str(&json_string)),
        Err(e) => {
            let error_msg = format!("Failed to serialize table state: {}", e);
            error!("{}", error_msg);
            Err(JsValue::from_str(&error_msg))
        }
    }
}

/// 画面左下の診断テキストの材料だよ。ポインタ直下の状況をまとめたもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerSummary {
    /// ポインタ直下にあるカード番号の一覧 (奥→手前の順)
    pub over_numbers: Vec<usize>,
    /// 一番手前のカードの番号
    pub top_number: Option<usize>,
    /// 一番手前のカードの真上に乗っているカードの番号
    pub linked_number: Option<usize>,
}

impl PointerSummary {
    /// 何かしらのカードの上にポインタがあるか
    pub fn is_over_anything(&self) -> bool {
        !self.over_numbers.is_empty()
    }

    /// "Mouse over card: [1, 4, 7]" みたいな表示用文字列を作るよ。
    pub fn over_numbers_text(&self) -> String {
        format!("[{}]", self.over_numbers.iter().map(|n| n.to_string()).join(", "))
    }
}

/// ポインタ座標から診断サマリーを計算する純粋クエリ。毎フレーム呼ばれるよ。
pub fn pointer_summary(world: &World, x: f32, y: f32) -> PointerSummary {
    let over_numbers: Vec<usize> = event_handler::cards_at(world, x, y)
        .into_iter()
        .map(|entity| {
            world
                .get_component::<Card>(entity)
                .map(|card| card.number)
                .unwrap_or_else(|| entity.card_number())
        })
        .collect();

    let top = event_handler::find_topmost_card_at(world, x, y);
    let linked_number = top
        .and_then(|entity| world.get_component::<PileLink>(entity))
        .map(|link| link.linked_to.card_number());

    PointerSummary {
        over_numbers,
        top_number: top.map(|entity| {
            world
                .get_component::<Card>(entity)
                .map(|card| card.number)
                .unwrap_or_else(|| entity.card_number())
        }),
        linked_number,
    }
}
