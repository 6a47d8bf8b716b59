//! Per-path method table.
//!
//! Every terminal node of the tree owns one [`MethodRouter`] per match kind
//! (exact or subtree). It maps explicit methods to endpoints and keeps one
//! optional slot for patterns registered without a method.

use http::Method;
use smallvec::SmallVec;

/// A registered value together with the pattern that registered it.
///
/// `names` lists the pattern's parameter names in path order; the tree
/// only records where parameters sit, so bindings are named from here.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint<T> {
    pub(crate) pattern: String,
    pub(crate) names: Vec<String>,
    pub(crate) value: T,
}

/// Method-keyed endpoints for a single path.
#[derive(Debug, Clone)]
pub(crate) struct MethodRouter<T> {
    methods: SmallVec<[(Method, Endpoint<T>); 2]>,
    any: Option<Endpoint<T>>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            methods: SmallVec::new(),
            any: None,
        }
    }
}

impl<T> MethodRouter<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns true if `method` (or the any-method slot for `None`) is taken.
    pub(crate) fn contains(&self, method: Option<&Method>) -> bool {
        match method {
            Some(method) => self.methods.iter().any(|(m, _)| m == method),
            None => self.any.is_some(),
        }
    }

    /// Stores an endpoint. The caller checks [`contains`](Self::contains) first.
    pub(crate) fn insert(&mut self, method: Option<Method>, endpoint: Endpoint<T>) {
        match method {
            Some(method) => self.methods.push((method, endpoint)),
            None => self.any = Some(endpoint),
        }
    }

    /// Resolves `method`: explicit entry, then GET for HEAD, then any-method.
    pub(crate) fn get(&self, method: &Method) -> Option<&Endpoint<T>> {
        self.find(method)
            .or_else(|| {
                if *method == Method::HEAD {
                    self.find(&Method::GET)
                } else {
                    None
                }
            })
            .or(self.any.as_ref())
    }

    /// Methods this path answers, for an `Allow` header. HEAD is implied by GET.
    pub(crate) fn allowed(&self) -> Vec<Method> {
        let mut allowed: Vec<Method> = self.methods.iter().map(|(m, _)| m.clone()).collect();
        if self.contains(Some(&Method::GET)) && !self.contains(Some(&Method::HEAD)) {
            allowed.push(Method::HEAD);
        }
        allowed
    }

    fn find(&self, method: &Method) -> Option<&Endpoint<T>> {
        self.methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, endpoint)| endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(value: &'static str) -> Endpoint<&'static str> {
        Endpoint {
            pattern: value.to_string(),
            names: Vec::new(),
            value,
        }
    }

    #[test]
    fn test_explicit_method_wins_over_any() {
        let mut router = MethodRouter::new();
        router.insert(None, endpoint("any"));
        router.insert(Some(Method::POST), endpoint("post"));

        assert_eq!(router.get(&Method::POST).map(|e| e.value), Some("post"));
        assert_eq!(router.get(&Method::DELETE).map(|e| e.value), Some("any"));
    }

    #[test]
    fn test_head_falls_back_to_get() {
        let mut router = MethodRouter::new();
        router.insert(Some(Method::GET), endpoint("get"));

        assert_eq!(router.get(&Method::HEAD).map(|e| e.value), Some("get"));
        assert!(router.get(&Method::POST).is_none());

        assert_eq!(router.allowed(), vec![Method::GET, Method::HEAD]);
    }

    #[test]
    fn test_explicit_head_is_not_duplicated_in_allowed() {
        let mut router = MethodRouter::new();
        router.insert(Some(Method::GET), endpoint("get"));
        router.insert(Some(Method::HEAD), endpoint("head"));

        assert_eq!(router.get(&Method::HEAD).map(|e| e.value), Some("head"));
        assert_eq!(router.allowed().len(), 2);
    }

    #[test]
    fn test_contains() {
        let mut router = MethodRouter::new();
        assert!(!router.contains(None));
        router.insert(None, endpoint("any"));
        assert!(router.contains(None));
        assert!(!router.contains(Some(&Method::GET)));
    }
}
