// src/components/card.rs

// serde を使う宣言！カード情報を診断用JSONにして JS 側に渡す時に使うよ！
use serde::{Serialize, Deserialize};
// Component トレイトを使う宣言！このファイルで作る構造体がコンポーネントであることを示すため！
use crate::ecs::component::Component; // `crate::` はプロジェクトのルートから、って意味ね！

/// カードの表示色を表す構造体だよ！🎨
///
/// このデモのカードにはスートもランクもなくて、見分けるのはランダムな色と番号だけ！
/// 各チャンネルは生成時に 50〜250 の範囲でランダムに決まる（暗すぎず明るすぎず！）。
///
/// #[derive(...)] のおまじないも忘れずに！
/// - Debug: デバッグ表示用 (`println!("{:?}", color);`)
/// - Clone, Copy: 簡単にコピーできるように
/// - PartialEq, Eq: 等しいか比較できるように (`==`)
/// - Serialize, Deserialize: JSON などに変換できるように
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CardColor {
    /// Canvas の fillStyle にそのまま渡せる CSS カラー文字列を作るよ。
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// カードそのものを表すコンポーネントだよ！🃏
///
/// これがエンティティに付けられる「データ」になるんだ。
/// 「このエンティティは、7番の青っぽいカードだよ！」みたいにね！
///
/// - `number`: カードの表示番号。生成時点の枚数 + 1 で割り当てられる 1 始まりの連番。
///             一度割り当てたら変わらないし、再利用もされない！
/// - `color`: カードの表示色
///
/// Component トレイトを実装するのを忘れないでね！ これがないと World に登録できない！🙅‍♀️
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub number: usize,
    pub color: CardColor,
}

// Card 構造体が Component であることを示すよ！
impl Component for Card {}

// --- テスト ---
// 簡単なテストを書いておこう！
#[cfg(test)]
mod tests {
    use super::*; // 上で定義した CardColor, Card を使う

    #[test]
    fn create_card_component() {
        let card = Card {
            number: 7,
            color: CardColor { r: 120, g: 80, b: 200 },
        };

        // 値がちゃんと設定されてるか確認
        assert_eq!(card.number, 7);
        assert_eq!(card.color, CardColor { r: 120, g: 80, b: 200 });

        // Component トレイトが実装されているかのチェック (コンパイルが通ればOKだけど念のため)
        fn needs_component<T: Component>(_: T) {}
        needs_component(card.clone());

        println!("Card コンポーネント作成テスト、成功！🎉");
    }

    #[test]
    fn color_to_css_string() {
        let color = CardColor { r: 50, g: 128, b: 250 };
        assert_eq!(color.to_css(), "rgb(50, 128, 250)");
        println!("CSSカラー文字列のテスト、成功！🎉");
    }
}
