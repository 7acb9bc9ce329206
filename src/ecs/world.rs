// src/ecs/world.rs

// === Rust 標準ライブラリからのインポート ===
// Any: 実行時に型情報を扱うためのトレイト。コンポーネントストレージを型に関係なく保持するために使う。
// TypeId: プログラム実行中に、それぞれの型にユニークなIDを割り当てるためのもの。コンポーネントの種類を区別するキーとして使う。
use std::any::{Any, TypeId};
// HashMap: キーと値のペアを高速に格納・検索できるデータ構造。TypeId をキーにして、その型のコンポーネントストレージ (Box<dyn Any> でラップ) を値として保持するのに使う。
use std::collections::HashMap;
// HashSet: 重複しない要素を格納するデータ構造。現在生存しているエンティティIDの高速チェックに使う。
use std::collections::HashSet;

// === このクレート (プロジェクト) 内の他のモジュールからのインポート ===
use crate::ecs::component::Component;
use crate::ecs::entity::Entity;

/// テーブル上の全てのカード（エンティティ）とコンポーネントを管理する中心的な構造体 (自作ECSのコア！)。
///
/// ソリティア系のスタック情報と違って、このデモで一番大事なのは **描画順 (Zオーダー)**。
/// だから `World` はエンティティの集合に加えて `paint_order` という順序付きリストを持つよ。
/// `paint_order` の並びがそのまま描画順で、**末尾 = 一番手前**！
/// チェーンを掴んだら `promote_to_top` でまとめて末尾に移動する（取り除いて追記、これだけ！）。
pub struct World {
    /// 現在生存しているエンティティIDのセット。エンティティが存在するかどうかを高速にチェックできる。
    alive: HashSet<Entity>,
    /// 描画順のレジストリ。先頭から順に描画するので、末尾が一番手前に見える。
    /// カードは破棄されないから、このリストは増えるだけ！
    paint_order: Vec<Entity>,
    /// 次に生成するエンティティに割り当てるID。エンティティが作成されるたびにインクリメントされる。
    next_entity_id: usize,
    /// コンポーネントの種類 (TypeId) ごとに、その型のデータ (`HashMap<Entity, T>`) を
    /// `Box<dyn Any>` で型消去して保持する倉庫。📦
    /// カードを破棄する操作が存在しないから、型ごとのお掃除関数は要らない。シンプル！
    component_stores: HashMap<TypeId, Box<dyn Any>>,
}

impl World {
    /// 新しい空の World を作成するコンストラクタ。
    pub fn new() -> Self {
        World {
            alive: HashSet::new(),
            paint_order: Vec::new(),
            next_entity_id: 0,
            component_stores: HashMap::new(),
        }
    }

    /// 新しいエンティティを生成し、その Entity を返す。
    /// `next_entity_id` をインクリメントして、ユニークなIDを保証する。
    /// 生成されたエンティティは生存セットに入り、描画順の **末尾** （＝一番手前）に追加されるよ。
    ///
    /// # 戻り値
    /// 新しく作成された `Entity`。
    pub fn create_entity(&mut self) -> Entity {
        let entity_id = self.next_entity_id;
        self.next_entity_id += 1;
        let entity = Entity(entity_id);
        self.alive.insert(entity);
        self.paint_order.push(entity); // 新入りは一番手前！
        entity
    }

    /// 指定されたエンティティが存在するかどうかを確認する。
    pub fn is_entity_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    /// 生成済みエンティティ（＝カード）の総数。
    /// グラフ走査の上限回数としても使うよ（レジストリサイズで打ち切り！）。
    pub fn card_count(&self) -> usize {
        self.paint_order.len()
    }

    /// 描画順のレジストリをそのまま貸し出す。先頭 = 一番奥、末尾 = 一番手前。
    /// レンダラはこの順で描くだけ、当たり判定は逆順に走査するだけ！
    pub fn paint_order(&self) -> &[Entity] {
        &self.paint_order
    }

    /// 指定されたエンティティ群を描画順の末尾にまとめて昇格させる。✨超重要メソッド！✨
    /// チェーンを掴んだ瞬間に呼ばれて、動かすカード一式を一番手前に持ってくるよ。
    ///
    /// やることは「取り除いて、追記する」だけ。メンバー同士の相対順は元のまま保たれる！
    /// （昇格はインデックスの安定した remove + append であって、描画の副作用じゃない）
    pub fn promote_to_top(&mut self, members: &HashSet<Entity>) {
        if members.is_empty() {
            return;
        }
        let mut promoted: Vec<Entity> = Vec::with_capacity(members.len());
        // retain は先頭から順に見ていくので、promoted には元の相対順で溜まっていく👍
        self.paint_order.retain(|entity| {
            if members.contains(entity) {
                promoted.push(*entity);
                false
            } else {
                true
            }
        });
        self.paint_order.extend(promoted);
    }

    /// 新しい型のコンポーネントを World に登録する。
    /// これにより、その型のコンポーネントをエンティティに追加できるようになる。
    /// 内部的には、そのコンポーネント型用の空ストレージ (`HashMap<Entity, T>`) を作って倉庫に入れるよ。
    ///
    /// # パニック
    /// しない。同じ型を二度登録したら警告だけ出して上書きする（普通は初期化時に一度だけ呼ぶ！）。
    pub fn register_component<T: Component + Any + 'static>(&mut self) {
        let type_id = TypeId::of::<T>();
        let new_storage: HashMap<Entity, T> = HashMap::new();
        if self
            .component_stores
            .insert(type_id, Box::new(new_storage))
            .is_some()
        {
            // もし insert が Some を返したら、それは既に同じ TypeId が存在してたってこと！
            // これは普通、初期化ロジックのミス！🙅‍♀️
            log::warn!(
                "World: Component type {} was registered more than once! Overwriting previous registration.",
                std::any::type_name::<T>()
            );
        }
    }

    /// 指定されたエンティティにコンポーネントを追加する。
    /// もしエンティティが生存していなければ、コンポーネントは追加されない (エラーにはならず、単に無視)。
    /// もし指定された型のコンポーネントストレージが存在しなければ (register_component 忘れ)、パニックする。
    /// もしエンティティに既に同じ型のコンポーネントが存在する場合、上書きされる。
    pub fn add_component<T: Component + Any + 'static>(&mut self, entity: Entity, component: T) {
        // エンティティが生きてるかチェック (死んでるエンティティには追加しない)
        if !self.is_entity_alive(entity) {
            return;
        }

        let type_id = TypeId::of::<T>();
        if let Some(storage_any) = self.component_stores.get_mut(&type_id) {
            if let Some(storage) = storage_any.downcast_mut::<HashMap<Entity, T>>() {
                let _old_component = storage.insert(entity, component);
            } else {
                // ダウンキャスト失敗。register_component で登録した型と違う型で呼んでるなど、
                // プログラムのロジックエラーの可能性が高い。
                panic!(
                    "World: Component storage downcast failed when adding component for {}. This should not happen!",
                    std::any::type_name::<T>()
                );
            }
        } else {
            // `component_stores` に `TypeId` が存在しない場合。`register_component<T>()` を呼び忘れている。
            panic!(
                "World: Component type {} not registered! Call register_component first.",
                std::any::type_name::<T>()
            );
        }
    }

    /// 指定されたエンティティから、指定された型のコンポーネントへの **読み取り専用** 参照を取得する。
    ///
    /// # 戻り値
    /// コンポーネントが見つかれば `Some(&T)`、見つからなければ (エンティティが存在しない、
    /// その型のコンポーネントが登録されていない、エンティティがそのコンポーネントを持っていない場合など) `None`。
    pub fn get_component<T: Component + Any + 'static>(&self, entity: Entity) -> Option<&T> {
        let type_id = TypeId::of::<T>();
        self.component_stores
            .get(&type_id)
            .and_then(|storage_any| storage_any.downcast_ref::<HashMap<Entity, T>>())
            .and_then(|storage| storage.get(&entity))
        // 途中で失敗 (型が登録されてない、ダウンキャスト失敗、コンポーネントがない) したら None が返る！美しい！✨
    }

    /// 指定されたエンティティから、指定された型のコンポーネントへの **書き込み可能** 参照を取得する。
    pub fn get_component_mut<T: Component + Any + 'static>(
        &mut self,
        entity: Entity,
    ) -> Option<&mut T> {
        // 可変参照を返すので、エンティティ生存チェックはここでやっておくと安全！
        if !self.is_entity_alive(entity) {
            return None;
        }

        let type_id = TypeId::of::<T>();
        self.component_stores
            .get_mut(&type_id)
            .and_then(|storage_any| storage_any.downcast_mut::<HashMap<Entity, T>>())
            .and_then(|storage| storage.get_mut(&entity))
    }

    /// 指定されたエンティティから、指定された型のコンポーネントを **削除** する。
    /// 削除されたコンポーネントの値そのものを返すよ！(もし存在すればね！)
    ///
    /// ドラッグ終了時の `DraggingInfo` 掃除と、チェーン切り離し時の `PileLink` 解除で使うんだ。🧹
    pub fn remove_component<T: Component + Any + 'static>(&mut self, entity: Entity) -> Option<T> {
        let type_id = TypeId::of::<T>();
        self.component_stores
            .get_mut(&type_id)
            .and_then(|storage_any| storage_any.downcast_mut::<HashMap<Entity, T>>())
            .and_then(|storage| storage.remove(&entity))
    }

    /// 指定された型のコンポーネントを持つ **全ての生存しているエンティティ** のリストを取得する。
    ///
    /// # 戻り値
    /// 指定された型のコンポーネントを持つエンティティの `Vec<Entity>`。
    /// その型のコンポーネントが登録されていない場合や、誰も持っていない場合は空の `Vec` を返す。
    pub fn get_all_entities_with_component<T: Component + Any + 'static>(&self) -> Vec<Entity> {
        let type_id = TypeId::of::<T>();
        if let Some(storage_any) = self.component_stores.get(&type_id) {
            if let Some(storage) = storage_any.downcast_ref::<HashMap<Entity, T>>() {
                storage
                    .keys()
                    .copied()
                    .filter(|e| self.is_entity_alive(*e))
                    .collect()
            } else {
                log::error!(
                    "World: Component storage downcast failed when getting all entities for {}. Returning empty Vec.",
                    std::any::type_name::<T>()
                );
                Vec::new()
            }
        } else {
            Vec::new()
        }
    }

    // --- 以下、テストコード用のヘルパーメソッド (外部公開はしない想定) ---

    /// 特定の型のコンポーネントストレージ (`HashMap<Entity, T>` が入った `Box<dyn Any>`) への
    /// **読み取り専用** 参照を取得する。（テストやデバッグ用）
    #[allow(dead_code)] // テスト以外で使わないので警告抑制
    pub(crate) fn storage<T: Component + Any + 'static>(&self) -> Option<&dyn Any> {
        let type_id = TypeId::of::<T>();
        self.component_stores
            .get(&type_id)
            .map(|storage_any| &**storage_any)
    }
} // impl World の終わり

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// テストコードは world_tests.rs に移動
// (world/ サブディレクトリは作らないので、隣のファイルを #[path] で指す！)
#[cfg(test)]
#[path = "world_tests.rs"]
mod world_tests;
