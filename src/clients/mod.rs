pub mod deepseek;
pub mod flexible;
pub mod mock;
pub mod openai;

pub use deepseek::{models::DeepSeekModel, DeepSeekClient, DeepSeekConfig};
pub use flexible::{ClientType, FlexibleClient, DEMO_QUIZ};
pub use mock::{MockClient, MockHandle, MockResponse};
pub use openai::{models::OpenAIModel, OpenAIClient, OpenAIConfig};
