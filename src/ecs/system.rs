// src/ecs/system.rs

// これまで作った World を使うからインポートするよ。
use crate::ecs::world::World;

/// System（システム）トレイトだよ！
///
/// システムは、テーブルのロジック（振る舞い）を実行する役割を持つんだ。
/// このデモだと「カードを一括生成するシステム」が代表例！
/// 特定の関心事に特化したロジックをカプセル化（ひとまとめに）するんだよ。💊
///
/// このトレイトを実装する構造体は、`run` メソッドを持つ必要があるよ。
/// `&mut World` を引数に取るのは、システムが World の中身を自由に変更できるようにするためだよ。
pub trait System {
    /// このシステムを実行するよ！
    ///
    /// # 引数
    /// - `world`: テーブル世界のデータ（エンティティとコンポーネント）を保持する World への可変参照。
    fn run(&mut self, world: &mut World);
}

// --- 簡単な System のテスト ---
// System トレイトだけだとテストしにくいから、簡単なダミーシステムを作って、
// それが World と連携できるか軽く見てみよう！ (本格的なテストは各 System 実装時に！)
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Component;
    use crate::ecs::entity::Entity;
    use crate::ecs::world::World;
    use std::collections::HashMap;

    // --- テスト用のダミーコンポーネント ---
    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        value: i32,
    }
    impl Component for Counter {}

    // --- テスト用のダミーシステム ---
    // 全ての Counter コンポーネントを +1 するシステム
    struct TickSystem;

    impl System for TickSystem {
        fn run(&mut self, world: &mut World) {
            // 先に対象のエンティティを集めてから可変借用する (借用規則対策！)
            let mut targets: HashMap<Entity, i32> = HashMap::new();
            for entity in world.get_all_entities_with_component::<Counter>() {
                if let Some(counter) = world.get_component::<Counter>(entity) {
                    targets.insert(entity, counter.value);
                }
            }
            for (entity, value) in targets {
                if let Some(counter) = world.get_component_mut::<Counter>(entity) {
                    counter.value = value + 1;
                }
            }
        }
    }

    #[test]
    fn dummy_system_runs_and_modifies_world() {
        let mut world = World::new();
        let mut tick_system = TickSystem; // 可変にするのを忘れずに！

        world.register_component::<Counter>();

        let entity1 = world.create_entity();
        world.add_component(entity1, Counter { value: 0 });
        let entity2 = world.create_entity();
        // entity2 には Counter は付けない

        // システムを実行！
        tick_system.run(&mut world);
        assert_eq!(world.get_component::<Counter>(entity1), Some(&Counter { value: 1 }));
        assert_eq!(world.get_component::<Counter>(entity2), None);

        // もう一回システムを実行！
        tick_system.run(&mut world);
        assert_eq!(world.get_component::<Counter>(entity1), Some(&Counter { value: 2 }));

        println!("ダミーシステムのテスト、成功！🎉");
    }
}
