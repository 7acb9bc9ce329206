// src/ecs/component.rs

/// Component（コンポーネント）トレイトだよ！
///
/// 構造体がカードテーブル世界のコンポーネントとして使われる資格があることを示すマーカー。
/// `'static` は型消去ストレージ (`Box<dyn Any>`) に入れるためのおまじない！
/// `std::fmt::Debug` はデバッグ出力 (`{:?}`) できるようにするためだよ。
pub trait Component: std::fmt::Debug + 'static {
    // 将来、共通メソッドが必要になったらここに追加できる！
}
