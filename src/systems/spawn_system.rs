// src/systems/spawn_system.rs

// === 使うものを宣言するよ！ ===
// World: エンティティやコンポーネントを管理する世界の中心！🌍
// components モジュール: カード(Card)とか位置(Position)とか、色々なデータ部品が入ってるよ。🃏📍
// logic::spawn: ランダムな色・位置を作ってくれる純粋関数たち
// rand クレート: ランダム生成に使うよ！🎲
use crate::components::{Card, Position};
use crate::ecs::entity::Entity;
use crate::ecs::system::System;
use crate::ecs::world::World;
use crate::logic::spawn::{random_color, random_spawn_position};
use rand::thread_rng;

// === カード一括生成システム！ ===
// 起動時（100枚）と「Add Card」ボタン（10枚）の両方で使われるシステムだよ。
// カード番号は「生成時点の枚数 + 1」で連番割り当て。欠番も再利用もなし！
pub struct SpawnCardsSystem {
    /// 今回のバッチで何枚生成するか
    count: usize,
}

impl SpawnCardsSystem {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// カードを1枚だけ生成して World に登録する。
    /// 新しいエンティティは描画順の末尾（一番手前）に入るよ。
    pub fn spawn_card(world: &mut World) -> Entity {
        let mut rng = thread_rng();
        // 番号は「いまの枚数 + 1」。create_entity より先に数えておく！
        let number = world.card_count() + 1;
        let entity = world.create_entity();

        world.add_component(entity, Card { number, color: random_color(&mut rng) });
        world.add_component(entity, random_spawn_position(&mut rng));

        log::info!("SpawnCardsSystem: spawned card #{} as {:?}", number, entity);
        entity
    }
}

impl System for SpawnCardsSystem {
    /// バッチ分のカードを生成するよ！ 🎉
    fn run(&mut self, world: &mut World) {
        for _ in 0..self.count {
            Self::spawn_card(world);
        }
        log::info!(
            "SpawnCardsSystem: batch of {} done, table now has {} cards",
            self.count,
            world.card_count()
        );
    }
}
