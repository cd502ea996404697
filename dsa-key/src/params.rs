//! Snapshot of a key's numeric components.

use core::fmt;
use num_bigint::BigUint;
use zeroize::Zeroizing;

/// Names one of the five numeric components of a DSA key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Component {
    /// Prime p
    P,

    /// Quotient q
    Q,

    /// Generator g
    G,

    /// Public component y
    PublicKey,

    /// Private component x
    PrivateKey,
}

impl Component {
    /// All components, in `Params` order.
    pub const ALL: [Self; 5] = [Self::P, Self::Q, Self::G, Self::PublicKey, Self::PrivateKey];

    /// Name used for this component by [`Params::get`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P => "p",
            Self::Q => "q",
            Self::G => "g",
            Self::PublicKey => "pub_key",
            Self::PrivateKey => "priv_key",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-shape snapshot of a key's components.
///
/// Absent components are zero. **This contains the private component when the
/// key has one**; it is zeroized on drop and left out of the `Debug` output,
/// but callers must not persist or log it.
#[derive(Clone, Eq, PartialEq)]
pub struct Params {
    /// Prime p
    pub p: BigUint,

    /// Quotient q
    pub q: BigUint,

    /// Generator g
    pub g: BigUint,

    /// Public component y
    pub pub_key: BigUint,

    /// Private component x
    pub priv_key: Zeroizing<BigUint>,
}

impl Params {
    /// Value of `component`.
    pub fn component(&self, component: Component) -> &BigUint {
        match component {
            Component::P => &self.p,
            Component::Q => &self.q,
            Component::G => &self.g,
            Component::PublicKey => &self.pub_key,
            Component::PrivateKey => &*self.priv_key,
        }
    }

    /// Look up a component by its name (`"p"`, `"q"`, `"g"`, `"pub_key"` or
    /// `"priv_key"`).
    pub fn get(&self, name: &str) -> Option<&BigUint> {
        Component::ALL
            .into_iter()
            .find(|component| component.as_str() == name)
            .map(|component| self.component(component))
    }

    /// Iterate over `(name, value)` pairs in the order p, q, g, pub_key, priv_key.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &BigUint)> + '_ {
        Component::ALL
            .into_iter()
            .map(|component| (component.as_str(), self.component(component)))
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("p", &self.p)
            .field("q", &self.q)
            .field("g", &self.g)
            .field("pub_key", &self.pub_key)
            .finish_non_exhaustive()
    }
}
