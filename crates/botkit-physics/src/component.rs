//! What the validator needs to know about a part.

use botkit_assembly::Part;
use botkit_ir::Specs;

/// Anything that carries physical specs.
pub trait Component {
    /// Physical specification.
    fn specs(&self) -> &Specs;

    /// Unit price, for the cost estimate.
    fn unit_price(&self) -> f64 {
        0.0
    }
}

impl Component for Specs {
    fn specs(&self) -> &Specs {
        self
    }
}

impl Component for Part {
    fn specs(&self) -> &Specs {
        Part::specs(self)
    }

    fn unit_price(&self) -> f64 {
        Part::unit_price(self)
    }
}

impl<C: Component + ?Sized> Component for &C {
    fn specs(&self) -> &Specs {
        (**self).specs()
    }

    fn unit_price(&self) -> f64 {
        (**self).unit_price()
    }
}
