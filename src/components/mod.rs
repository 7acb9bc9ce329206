// src/components/mod.rs

// この components モジュールに属するサブモジュールを宣言するよ！
pub mod card;
pub mod dragging_info;
pub mod pile_link; // 山の繋がりを表す肝心かなめのコンポーネント！🔗
pub mod position; // 位置は position.rs！📍

// よく使う型はここで再エクスポートしておくと、
// `crate::components::{Card, Position, ...}` って書けて便利！✨
pub use card::{Card, CardColor};
pub use dragging_info::DraggingInfo;
pub use pile_link::PileLink;
pub use position::Position;
