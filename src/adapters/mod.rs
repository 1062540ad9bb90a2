// Adapters layer: concrete implementations of the domain ports (browser, mail, storage).

pub mod smtp;
pub mod storage;
pub mod webdriver;

pub use smtp::SmtpNotifier;
pub use storage::LocalStorage;
pub use webdriver::WebDriverFetcher;
