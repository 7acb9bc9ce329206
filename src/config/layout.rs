// src/config/layout.rs
//! テーブル画面のレイアウトに関する定数を定義するよ！
//! ウィンドウやカードの寸法、山の重なりオフセットなど。

// --- ウィンドウ ---
pub const WINDOW_WIDTH: f32 = 1200.0; // キャンバスの幅
pub const WINDOW_HEIGHT: f32 = 800.0; // キャンバスの高さ

// --- カード ---
pub const CARD_WIDTH: f32 = 55.0; // カード矩形の幅
pub const CARD_HEIGHT: f32 = 80.0; // カード矩形の高さ
/// 山に積んだとき、1枚ごとに下へずらすオフセット。
/// これで下のカードの番号が帯状に見えて「扇状の山」っぽくなる！
pub const TOP_OFFSET: f32 = CARD_HEIGHT * 0.2;

// --- カード生成 ---
pub const PRE_GENERATE_CARDS: usize = 100; // 起動時に配る枚数
pub const CARDS_TO_ADD: usize = 10; // ボタン1クリックで追加する枚数
/// ランダム配置の余白。x は `SPAWN_MARGIN..WINDOW_WIDTH - CARD_WIDTH * 2`、
/// y は `SPAWN_MARGIN..WINDOW_HEIGHT - CARD_HEIGHT * 2` の範囲に置くよ。
pub const SPAWN_MARGIN: f32 = 50.0;

// --- 追加ボタン ---
// 外枠とその内側 10px の当たり判定用矩形の2枚構成。
pub const BUTTON_X: f32 = 10.0;
pub const BUTTON_Y: f32 = 10.0;
pub const BUTTON_WIDTH: f32 = 150.0;
pub const BUTTON_HEIGHT: f32 = 50.0;
pub const BUTTON_INSET: f32 = 10.0; // 内側矩形のインセット

// --- 診断テキスト ---
pub const DIAG_TEXT_X: f32 = 10.0; // 画面左下に積み上げるテキストのX座標
pub const FPS_TEXT_X: f32 = WINDOW_WIDTH - 150.0; // FPS表示のX座標
pub const FPS_TEXT_Y: f32 = 30.0;
