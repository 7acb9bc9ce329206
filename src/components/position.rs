// src/components/position.rs

// serde を使う宣言！位置情報を診断用JSONに入れたりするかも！
use serde::{Serialize, Deserialize};
// Component トレイトを使う宣言！Position がコンポーネントであることを示す！
use crate::ecs::component::Component;

/// 2D空間での位置を表すコンポーネントだよ！ カード矩形の **左上** の (x, y) 座標を持つよ。📍
///
/// カードの矩形サイズは `config::layout` の `CARD_WIDTH` × `CARD_HEIGHT` 固定だから、
/// 位置さえあれば当たり判定も描画もできちゃう！
///
/// 座標の型は `f32`。ドラッグで滑らかに動かすから小数点以下も扱えると便利だからね！😉
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

// Position 構造体が Component であることを示すマーカー！ これ大事！✅
impl Component for Position {}
