use std::collections::BTreeMap;
use std::fmt;

use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult, Rest, Value};
use minijinja::{Environment, Error, State};

use crate::error::ConfigError;

/// A registry of named functions and filters a view can install.
///
/// Callables are registered here once by the host.  Which of them end up in
/// a view's environment is decided by the `register_functions` and
/// `register_filters` lists of the [`ViewConfig`](crate::ViewConfig).
///
/// [`Extensions::default`] comes pre-populated with the helpers of
/// `minijinja-contrib` when the `contrib` feature is enabled, while
/// [`Extensions::new`] starts out empty.
///
/// ```
/// use minijinja_view::Extensions;
///
/// fn shout(value: String) -> String {
///     value.to_uppercase()
/// }
///
/// let mut extensions = Extensions::new();
/// extensions.add_filter("shout", shout);
/// assert!(extensions.contains_filter("shout"));
/// ```
#[derive(Clone)]
pub struct Extensions {
    functions: BTreeMap<String, Value>,
    filters: BTreeMap<String, Value>,
}

impl Default for Extensions {
    fn default() -> Self {
        #[allow(unused_mut)]
        let mut rv = Extensions::new();
        #[cfg(feature = "contrib")]
        {
            add_contrib(&mut rv);
        }
        rv
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Extensions {
    /// Creates an empty registry.
    pub fn new() -> Extensions {
        Extensions {
            functions: BTreeMap::new(),
            filters: BTreeMap::new(),
        }
    }

    /// Registers a function under a name.
    pub fn add_function<N, F, Rv, Args>(&mut self, name: N, f: F) -> &mut Self
    where
        N: Into<String>,
        // the crazy bounds here exist to enable borrowing in closures
        F: Function<Rv, Args> + for<'a> Function<Rv, <Args as FunctionArgs<'a>>::Output>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.functions.insert(name.into(), Value::from_function::<F, Rv, Args>(f));
        self
    }

    /// Registers a filter under a name.
    ///
    /// The filtered value is passed as first argument.
    pub fn add_filter<N, F, Rv, Args>(&mut self, name: N, f: F) -> &mut Self
    where
        N: Into<String>,
        // the crazy bounds here exist to enable borrowing in closures
        F: Function<Rv, Args> + for<'a> Function<Rv, <Args as FunctionArgs<'a>>::Output>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.filters.insert(name.into(), Value::from_function::<F, Rv, Args>(f));
        self
    }

    /// Returns `true` if a function with this name is registered.
    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Returns `true` if a filter with this name is registered.
    pub fn contains_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Installs the named functions and filters into an environment.
    pub(crate) fn install(
        &self,
        env: &mut Environment<'static>,
        functions: &[String],
        filters: &[String],
    ) -> Result<(), ConfigError> {
        for name in functions {
            let function = self
                .functions
                .get(name)
                .ok_or_else(|| ConfigError::UnknownFunction(name.clone()))?;
            env.add_global(name.clone(), function.clone());
        }
        for name in filters {
            let filter = self
                .filters
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownFilter(name.clone()))?;
            env.add_filter(
                name.clone(),
                move |state: &State, args: Rest<Value>| -> Result<Value, Error> {
                    filter.call(state, &args[..])
                },
            );
        }
        Ok(())
    }
}

#[cfg(feature = "contrib")]
fn add_contrib(extensions: &mut Extensions) {
    use minijinja_contrib::{filters, globals};

    extensions
        .add_function("cycler", globals::cycler)
        .add_function("joiner", globals::joiner)
        .add_filter("pluralize", filters::pluralize)
        .add_filter("filesizeformat", filters::filesizeformat)
        .add_filter("truncate", filters::truncate);
    #[cfg(feature = "datetime")]
    {
        extensions
            .add_function("now", globals::now)
            .add_filter("datetimeformat", filters::datetimeformat)
            .add_filter("dateformat", filters::dateformat)
            .add_filter("timeformat", filters::timeformat);
    }
}
