// src/components/dragging_info.rs

use serde::{Deserialize, Serialize};
use crate::ecs::component::Component; // Component トレイトを使うためにインポート

/// ドラッグ中のカードに関する情報を表すコンポーネントだよ！🖱️➡️🃏
/// これは内部的な状態管理に使うもので、Wasm 公開は不要 (一旦 #[wasm_bindgen] は付けない)。
///
/// ドラッグセッションが始まった瞬間に、動かすチェーンの **全メンバー** に付けられて、
/// セッションが終わったら（成功でも失敗でも）全部剥がされるよ。
/// つまり「このコンポーネントを持っている ⟺ いままさにドラッグされている」！
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DraggingInfo {
    /// ドラッグ開始時のマウスとカード左上のオフセット X
    pub offset_x: f32,
    /// ドラッグ開始時のマウスとカード左上のオフセット Y
    pub offset_y: f32,
}

// この構造体が Component であることを示すマーカー実装
impl Component for DraggingInfo {}
