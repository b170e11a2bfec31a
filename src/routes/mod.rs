use glob::PatternError;

use crate::config::TopicConfig;
use crate::filter::EntityFilter;

/// One publish destination: a Kafka topic and its own entity filter.
#[derive(Clone, Debug)]
pub struct Route {
    pub topic: String,
    pub filter: EntityFilter,
}

/// Ordered, fixed-at-construction sequence of routes.
///
/// Iteration order is declaration order for the life of the process.
/// Duplicate topic names are kept and evaluated independently.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Build the table from validated configuration, compiling each
    /// per-topic filter. Fails on a malformed glob.
    pub fn from_config(topics: &[TopicConfig]) -> Result<Self, PatternError> {
        let mut routes = Vec::with_capacity(topics.len());
        for topic in topics {
            routes.push(Route {
                topic: topic.topic.clone(),
                filter: EntityFilter::from_config(&topic.filter)?,
            });
        }
        Ok(Self { routes })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}
