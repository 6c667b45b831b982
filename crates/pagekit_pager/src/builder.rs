//! Pager construction
//!
//! ```ignore
//! use pagekit_pager::{PagerBuilder, PagerCallbacks, PagerConfig};
//!
//! let (pager, mut host) = PagerBuilder::new(PagerConfig::default().with_lazy(1))
//!     .children(["feed", "search", "profile"])
//!     .callbacks(PagerCallbacks::new().on_page_selected(|page| println!("page {page}")))
//!     .build()?;
//!
//! pager.on_layout(390.0, 844.0);
//! pager.set_page(2);
//! host.pump();
//! ```

use pagekit_animation::SpringConfig;
use pagekit_core::channel;

use crate::clipping::{ClippingPolicy, DefaultClippingPolicy};
use crate::config::PagerConfig;
use crate::engine::{PagerEngine, SpringConfigFn, SpringRequest};
use crate::error::Result;
use crate::events::PagerCallbacks;
use crate::handle::PagerRef;
use crate::host::PagerHost;
use crate::interpolator::ScrollOffsetInterpolator;
use crate::page::PageKey;
use crate::style::PageStyleInterpolator;

/// Builder for a pager's engine handle and application-side host
pub struct PagerBuilder {
    config: PagerConfig,
    children: Vec<PageKey>,
    interpolator: Option<Box<dyn ScrollOffsetInterpolator>>,
    style: Option<Box<dyn PageStyleInterpolator>>,
    spring_config: Option<SpringConfigFn>,
    clipping_policy: Box<dyn ClippingPolicy>,
    callbacks: PagerCallbacks,
}

impl PagerBuilder {
    pub fn new(config: PagerConfig) -> Self {
        Self {
            config,
            children: Vec::new(),
            interpolator: None,
            style: None,
            spring_config: None,
            clipping_policy: Box::new(DefaultClippingPolicy),
            callbacks: PagerCallbacks::default(),
        }
    }

    pub fn children<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PageKey>,
    {
        self.children = keys.into_iter().map(Into::into).collect();
        self
    }

    /// `count` children keyed by index
    pub fn page_count(mut self, count: usize) -> Self {
        self.children = PageKey::indexed(count);
        self
    }

    /// Replace the interpolator selected by `scroll_offset`
    pub fn scroll_offset_interpolator(mut self, interpolator: impl ScrollOffsetInterpolator + 'static) -> Self {
        self.interpolator = Some(Box::new(interpolator));
        self
    }

    /// Replace the style selected by `page_style`
    pub fn page_style_interpolator(mut self, style: impl PageStyleInterpolator + 'static) -> Self {
        self.style = Some(Box::new(style));
        self
    }

    pub fn spring_config<F>(mut self, f: F) -> Self
    where
        F: Fn(SpringRequest) -> SpringConfig + Send + 'static,
    {
        self.spring_config = Some(Box::new(f));
        self
    }

    pub fn clipping_policy(mut self, policy: impl ClippingPolicy + 'static) -> Self {
        self.clipping_policy = Box::new(policy);
        self
    }

    pub fn callbacks(mut self, callbacks: PagerCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Validate the configuration and create the pager
    pub fn build(self) -> Result<(PagerRef, PagerHost)> {
        self.config.validate()?;

        let (dispatcher, queue) = channel();
        let mut engine = PagerEngine::new(self.config.clone(), self.children, dispatcher);
        engine.set_clipping_policy(self.clipping_policy.as_ref());
        if let Some(interpolator) = self.interpolator {
            engine.set_scroll_offset_interpolator(interpolator);
        }
        if let Some(style) = self.style {
            engine.set_page_style_interpolator(style);
        }
        if let Some(spring_config) = self.spring_config {
            engine.set_spring_config_fn(spring_config);
        }

        let keys = engine.keys().to_vec();
        let initial_page = engine.current_page();
        tracing::debug!(pages = keys.len(), initial_page, "pager built");

        let mut host = PagerHost::new(&self.config, keys, initial_page, queue);
        host.set_callbacks(self.callbacks);
        Ok((PagerRef::new(engine.into_shared()), host))
    }
}

impl std::fmt::Debug for PagerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerBuilder")
            .field("config", &self.config)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
