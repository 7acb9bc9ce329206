// src/ecs/entity.rs

// まずは serde を使う宣言だよ！
// カードIDを診断用JSONに入れて JS 側に渡したりする時に役立つんだ！
use serde::{Serialize, Deserialize};

/// Entity（エンティティ）とは、テーブルに登場する「モノ」を表すただの識別子（ID）だよ！
/// このデモではエンティティ＝カード1枚。カードは生成されるだけで破棄されないから、
/// IDは 0 から始まる連番のまま一生変わらない（再利用もしない！）。
///
/// この ID は、単なる数字（ここでは usize 型、符号なし整数）で、
/// これだけだと意味はないんだけど、「コンポーネント」と組み合わせることで、
/// 「IDが 5 のエンティティは、6番のカードで、座標 (10, 20) にある」
/// みたいに意味を持たせることができるんだ！便利でしょ？ ✨
///
/// #[derive(...)] っていうのは、Rustが自動的に便利な機能を追加してくれるおまじないみたいなものだよ！
/// - PartialEq, Eq: ID同士が同じかどうか比較できるようにする (`==` とか)
/// - PartialOrd, Ord: IDの大小を比較できるようにする (`<` とか `>`)
/// - Hash: IDを高速に検索できるデータ構造（HashMapとか）で使えるようにする
/// - Clone, Copy: IDを簡単に複製できるようにする
/// - Debug: IDをデバッグ出力 (`println!("{:?}", entity);` みたいに) できるようにする
/// - Serialize, Deserialize: serde でJSONなどに変換できるようにする
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Serialize, Deserialize,
)]
pub struct Entity(pub usize); // usize 型の数値を保持するタプル構造体。これがエンティティIDの実体！

impl Entity {
    /// カードの表示番号 (1始まり) を返すヘルパーだよ。
    /// エンティティIDは 0 始まりの連番で、カード番号は「生成時点の枚数 + 1」。
    /// カードは絶対に破棄されないから、この2つはずっと `number == id + 1` の関係！🔢
    pub fn card_number(self) -> usize {
        self.0 + 1
    }
}
