use super::{Flagger, KeywordFlagger, PatternFlagger};

pub trait FlaggerFactory: Send {
    fn initialized_flaggers(&self) -> Vec<Box<dyn Flagger>>;
}

/// Default factory: `[PatternFlagger, KeywordFlagger]`, in that order.
pub struct DefaultFlaggerFactory;

impl FlaggerFactory for DefaultFlaggerFactory {
    fn initialized_flaggers(&self) -> Vec<Box<dyn Flagger>> {
        vec![
            Box::new(PatternFlagger::with_defaults()),
            Box::new(KeywordFlagger::with_defaults()),
        ]
    }
}
