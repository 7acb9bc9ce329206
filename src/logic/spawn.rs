// src/logic/spawn.rs

use crate::components::card::CardColor;
use crate::components::position::Position;
use crate::config::layout::{CARD_HEIGHT, CARD_WIDTH, SPAWN_MARGIN, WINDOW_HEIGHT, WINDOW_WIDTH};
use rand::Rng;

/// ランダムなカード色を1つ作る関数だよ！🎨
///
/// 各チャンネルは 50〜250 の範囲。真っ黒や真っ白に寄りすぎない、
/// 番号の白文字がちゃんと読める色になるよ。
pub fn random_color<R: Rng>(rng: &mut R) -> CardColor {
    CardColor {
        r: rng.gen_range(50..=250),
        g: rng.gen_range(50..=250),
        b: rng.gen_range(50..=250),
    }
}

/// 新しいカードのランダムな初期位置を1つ作る関数だよ。
///
/// ウィンドウの端にめり込まないように、左上は `SPAWN_MARGIN` から、
/// 右下はカード2枚分のマージンを残した範囲で選ぶ。
pub fn random_spawn_position<R: Rng>(rng: &mut R) -> Position {
    Position {
        x: rng.gen_range(SPAWN_MARGIN..WINDOW_WIDTH - CARD_WIDTH * 2.0),
        y: rng.gen_range(SPAWN_MARGIN..WINDOW_HEIGHT - CARD_HEIGHT * 2.0),
    }
}
