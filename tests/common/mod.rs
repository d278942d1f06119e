pub mod macros;

use regsim_core::config::DefaultsConfig;
use regsim_core::definition::ElementDefinition;
use regsim_core::simulation::{run_simulation, SimulationParams};
use regsim_core::{Expr, Metrics, Network};
use regsim_data::{FrequencySummary, InitialValue, SpontaneousDelays, Toggle, UpdateScheme};

type DefinitionMod = Box<dyn FnOnce(&mut ElementDefinition)>;

/// Builds small networks element by element for scenario tests.
#[allow(dead_code)]
pub struct NetworkBuilder {
    definitions: Vec<(ElementDefinition, Vec<DefinitionMod>)>,
}

#[allow(dead_code)]
impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Adds an element with no delays, no spontaneous drift and initial 0.
    pub fn element(mut self, name: &str, max_state: u32, act: &str, inh: &str) -> Self {
        let mut def = ElementDefinition::new(name, max_state);
        def.activators = Expr::parse(act).expect("activator expression");
        def.inhibitors = Expr::parse(inh).expect("inhibitor expression");
        self.definitions.push((def, Vec::new()));
        self
    }

    fn last(&mut self, modifier: DefinitionMod) {
        self.definitions
            .last_mut()
            .expect("add an element first")
            .1
            .push(modifier);
    }

    pub fn initial(mut self, value: u32) -> Self {
        self.last(Box::new(move |d| d.initial = InitialValue::Fixed(value)));
        self
    }

    pub fn random_initial(mut self) -> Self {
        self.last(Box::new(|d| d.initial = InitialValue::Random));
        self
    }

    pub fn delays(mut self, delays: Vec<u32>) -> Self {
        self.last(Box::new(move |d| d.delays = delays));
        self
    }

    pub fn spontaneous(mut self, activation: Option<u32>, inhibition: Option<u32>) -> Self {
        self.last(Box::new(move |d| {
            d.spontaneous = SpontaneousDelays {
                activation,
                inhibition,
            }
        }));
        self
    }

    pub fn toggle(mut self, step: usize, value: u32) -> Self {
        self.last(Box::new(move |d| d.toggles.push(Toggle { step, value })));
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        let group = group.to_string();
        self.last(Box::new(move |d| d.update_group = Some(group)));
        self
    }

    pub fn build(self) -> Network {
        let definitions = self
            .definitions
            .into_iter()
            .map(|(mut def, mods)| {
                for m in mods {
                    m(&mut def);
                }
                def
            })
            .collect();
        Network::from_definitions(definitions).expect("valid network")
    }
}

/// Defaults without spontaneous drift, so rows behave purely by regulation.
#[allow(dead_code)]
pub fn quiet_defaults() -> DefaultsConfig {
    DefaultsConfig {
        max_state: 3,
        spontaneous_activation: None,
        spontaneous_inhibition: None,
    }
}

#[allow(dead_code)]
pub fn params(scheme: UpdateScheme, runs: usize, steps: usize, seed: u64) -> SimulationParams {
    SimulationParams {
        scheme,
        runs,
        steps,
        seed: Some(seed),
    }
}

/// Runs sequentially with no observer.
#[allow(dead_code)]
pub fn summarize(network: &mut Network, params: &SimulationParams) -> FrequencySummary {
    run_simulation(network, params, &mut (), &Metrics::new()).expect("simulation")
}
