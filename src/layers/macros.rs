//! Macros to reduce boilerplate in layer implementations

/// Implements the accessors of `LayerTrait` that every layer writes the
/// same way: its properties field and `Any` access.
///
/// ```ignore
/// impl LayerTrait for MyLayer {
///     mapview::impl_layer_trait!(properties);
///
///     fn options(&self) -> serde_json::Value { serde_json::json!({}) }
/// }
/// ```
#[macro_export]
macro_rules! impl_layer_trait {
    ($properties:ident) => {
        fn properties(&self) -> &$crate::layers::base::LayerProperties {
            &self.$properties
        }

        fn properties_mut(&mut self) -> &mut $crate::layers::base::LayerProperties {
            &mut self.$properties
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}
