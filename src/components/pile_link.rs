// src/components/pile_link.rs

// serde を使うためにインポート！Serialize と Deserialize トレイトを使うよ。
use serde::{Serialize, Deserialize};
// Component トレイトを実装して、ECS で使えるようにする。
use crate::ecs::component::Component;
use crate::ecs::entity::Entity;

/// カード同士の「山 (パイル)」の繋がりを表すコンポーネントだよ。🔗
///
/// `linked_to` は **このカードの真上に直接重なっているカード** のIDを指すよ。
/// カードXにカードYをドロップすると、X側に `PileLink { linked_to: Y }` が付く、って向き！
/// だからリンクを順方向にたどると「そのカード＋その上に乗っている全部」が出てくるんだ。
///
/// このコンポーネントが **付いていない** カードは、山の一番上 (テール) か、
/// どこにも属していないフリーのカード。Option を持ち歩く代わりに、
/// コンポーネントの有無そのもので「リンクなし」を表現してるよ！
///
/// 付け外しするのは2箇所だけ：
/// - ドロップ確定時に、接続先テールへ挿入される
/// - ドロップ解決の切り離しステップで、元の親から取り除かれる
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PileLink {
    /// このカードの真上に重なっているカードのエンティティID。
    pub linked_to: Entity,
}

impl PileLink {
    /// 新しい PileLink を作成するヘルパー関数。
    pub fn new(linked_to: Entity) -> Self {
        Self { linked_to }
    }
}

// PileLink をコンポーネントとして使えるように、Component トレイトを実装！
// 中身は空でOK！マーカーとして機能するよ。
impl Component for PileLink {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pile_link_creation() {
        let link = PileLink::new(Entity(3));
        assert_eq!(link.linked_to, Entity(3));
        assert_eq!(link, PileLink { linked_to: Entity(3) });

        println!("PileLink 作成テスト、成功！👍");
    }
}
