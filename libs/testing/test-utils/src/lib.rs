//! Shared test utilities for the costing crates
//!
//! - `TestDataBuilder`: deterministic project metadata from the test name
//! - `ComponentBuilder`: cut parts with sensible defaults
//! - `catalog`: a seeded price list and in-memory catalog
//! - `assertions`: float and option helpers
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{catalog, ComponentBuilder, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_costing_test() {
//!     let catalog = catalog::seeded_catalog();
//!     let project = TestDataBuilder::from_test_name("my_costing_test").project();
//!
//!     let side = ComponentBuilder::new("Side")
//!         .material(catalog::MDF_16)
//!         .size(720.0, 560.0)
//!         .quantity(2)
//!         .build();
//! }
//! ```

use domain_costing::{ProjectMeta, RawComponent};

pub mod catalog;

/// Builder for test data with deterministic values
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_kitchen_quote");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// "test-{prefix}-{seed}-{suffix}"
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Project metadata unique to this builder
    pub fn project(&self) -> ProjectMeta {
        ProjectMeta {
            project_name: self.name("project", "main"),
            client_name: self.name("client", "main"),
            contract_date: "1403/07/01".to_string(),
            custom_fields: Default::default(),
        }
    }
}

/// Builder for [`RawComponent`] with area derived from the size
#[derive(Debug, Clone)]
pub struct ComponentBuilder {
    component: RawComponent,
}

impl ComponentBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            component: RawComponent {
                name: name.to_string(),
                component_id: name.to_lowercase().replace(' ', "-"),
                quantity: 1,
                material_type: catalog::MDF_16.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.component.quantity = quantity;
        self
    }

    pub fn material(mut self, material: &str) -> Self {
        self.component.material_type = material.to_string();
        self
    }

    pub fn instance(mut self, instance_type: &str) -> Self {
        self.component.instance_type = instance_type.to_string();
        self
    }

    /// Length and width in mm; the piece area (m²) follows
    pub fn size(mut self, length: f64, width: f64) -> Self {
        self.component.length = length;
        self.component.width = width;
        self.component.area = length * width / 1_000_000.0;
        self
    }

    /// Override the piece area without touching length/width
    pub fn area(mut self, area: f64) -> Self {
        self.component.area = area;
        self
    }

    pub fn thickness(mut self, thickness: f64) -> Self {
        self.component.thickness = Some(thickness);
        self
    }

    /// Band the first `count` edges (0..=4) with `code`
    pub fn edges(mut self, count: usize, code: &str) -> Self {
        let edges = [
            &mut self.component.edge1,
            &mut self.component.edge2,
            &mut self.component.edge3,
            &mut self.component.edge4,
        ];
        for (index, edge) in edges.into_iter().enumerate() {
            *edge = if index < count {
                code.to_string()
            } else {
                String::new()
            };
        }
        self
    }

    pub fn build(self) -> RawComponent {
        self.component
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert two amounts agree within `tolerance`
    pub fn assert_close(actual: f64, expected: f64, tolerance: f64, context: &str) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{}: expected {} (±{}), got {}",
            context,
            expected,
            tolerance,
            actual
        );
    }

    /// Assert two money amounts agree to the cent
    pub fn assert_amount(actual: f64, expected: f64, context: &str) {
        assert_close(actual, expected, 0.01, context);
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::from_test_name("my_test");
        let builder2 = TestDataBuilder::from_test_name("my_test");

        assert_eq!(builder1.project(), builder2.project());
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(
            builder1.project().project_name,
            builder2.project().project_name
        );
    }

    #[test]
    fn test_component_builder() {
        let component = ComponentBuilder::new("Drawer Front")
            .size(600.0, 400.0)
            .quantity(3)
            .edges(2, "PVC")
            .build();

        assert_eq!(component.component_id, "drawer-front");
        assert_eq!(component.quantity, 3);
        assert!((component.area - 0.24).abs() < 1e-12);
        assert_eq!(component.edges(), ["PVC", "PVC", "", ""]);
    }

    #[test]
    #[should_panic(expected = "expected 10")]
    fn test_assert_close_fails_outside_tolerance() {
        assertions::assert_close(10.5, 10.0, 0.1, "total");
    }
}
