pub mod implementations;
pub mod trait_template;

pub use implementations::core_template::CoreTemplateProvider;
pub use implementations::test_provider::TestTemplateProvider;
pub use trait_template::{GenomeSource, TemplateProvider};
