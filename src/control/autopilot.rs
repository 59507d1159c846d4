use std::time::Duration;

use tracing::{info, warn};

use super::guidance::GravityTurn;
use super::launch_stages::StageController;
use super::maneuver::{self, BurnPlan};
use super::vessel::{NodeHandle, Vessel};
use crate::config::LaunchConfig;
use crate::errors::AutopilotError;
use crate::telemetry_system::panel::{FlightPanel, FlightReadout};
use crate::telemetry_system::telemetry::Telemetry;
use crate::utils::poller::{CancelToken, Poller};

/// Flight phases in the order they are flown. Transitions only move forward.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum FlightPhase {
    PreLaunch,
    Ascent,
    GravityTurn,
    ApoapsisApproach,
    CoastOutOfAtmosphere,
    BurnPlanning,
    BurnOrientation,
    BurnWait,
    BurnExecute,
    Complete,
}

impl FlightPhase {
    /// Phases with the engines lit. Staging is only checked in these.
    pub fn is_powered(&self) -> bool {
        matches!(
            self,
            FlightPhase::Ascent
                | FlightPhase::GravityTurn
                | FlightPhase::ApoapsisApproach
                | FlightPhase::BurnExecute
        )
    }

    fn activity(&self) -> &'static str {
        match self {
            FlightPhase::PreLaunch => "waiting for launch",
            FlightPhase::Ascent => "climbing vertically",
            FlightPhase::GravityTurn => "flying the gravity turn",
            FlightPhase::ApoapsisApproach => "raising apoapsis to target",
            FlightPhase::CoastOutOfAtmosphere => "coasting out of the atmosphere",
            FlightPhase::BurnPlanning => "planning the circularization burn",
            FlightPhase::BurnOrientation => "orienting for the burn",
            FlightPhase::BurnWait => "waiting for the burn window",
            FlightPhase::BurnExecute => "executing the circularization burn",
            FlightPhase::Complete => "finishing",
        }
    }
}

/// Launch-to-orbit sequencer. Each [`Autopilot::step`] refreshes telemetry,
/// runs the current phase's checks once and moves to the next phase when its
/// guard holds.
pub struct Autopilot<V: Vessel, P: FlightPanel> {
    vessel: V,
    panel: P,
    config: LaunchConfig,
    stage_controller: StageController,
    gravity_turn: GravityTurn,
    phase: FlightPhase,
    plan: Option<BurnPlan>,
    node: Option<NodeHandle>,
    warped: bool,
    fine_tuning: bool,
    telemetry: Telemetry,
    poller: Poller,
    ticks: u64,
}

impl<V: Vessel, P: FlightPanel> Autopilot<V, P> {
    pub fn new(vessel: V, panel: P, config: LaunchConfig) -> Self {
        let poller = Poller::new(config.poll_interval()).with_timeout(config.timeout());
        Autopilot {
            vessel,
            panel,
            stage_controller: StageController::new(config.max_auto_stage),
            gravity_turn: GravityTurn::new(
                config.turn_start_altitude,
                config.turn_end_altitude,
                config.heading,
                config.turn_hysteresis,
            ),
            config,
            phase: FlightPhase::PreLaunch,
            plan: None,
            node: None,
            warped: false,
            fine_tuning: false,
            telemetry: Telemetry::new(),
            poller,
            ticks: 0,
        }
    }

    pub fn with_poller(mut self, poller: Poller) -> Self {
        self.poller = poller;
        self
    }

    /// Picks up a flight that is already past launch, e.g. coasting after a
    /// manual ascent.
    pub fn starting_in(mut self, phase: FlightPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn plan(&self) -> Option<BurnPlan> {
        self.plan
    }

    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }

    pub fn vessel(&self) -> &V {
        &self.vessel
    }

    pub fn vessel_mut(&mut self) -> &mut V {
        &mut self.vessel
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.poller.cancel_token()
    }

    pub fn into_parts(self) -> (V, P, Telemetry) {
        (self.vessel, self.panel, self.telemetry)
    }

    pub fn run(&mut self) -> Result<(), AutopilotError> {
        self.poller.restart();
        while self.phase != FlightPhase::Complete {
            self.step()?;
            if self.phase != FlightPhase::Complete {
                self.poller.pause(self.phase.activity())?;
            }
        }
        self.telemetry.display_data();
        Ok(())
    }

    pub fn step(&mut self) -> Result<FlightPhase, AutopilotError> {
        self.vessel.refresh()?;
        self.ticks += 1;

        if !matches!(self.phase, FlightPhase::PreLaunch | FlightPhase::Complete) {
            self.update_display()?;
        }
        if self.phase.is_powered() {
            self.run_staging()?;
        }

        let next = match self.phase {
            FlightPhase::PreLaunch => self.pre_launch()?,
            FlightPhase::Ascent | FlightPhase::GravityTurn => self.climb()?,
            FlightPhase::ApoapsisApproach => self.approach_apoapsis()?,
            FlightPhase::CoastOutOfAtmosphere => self.coast()?,
            FlightPhase::BurnPlanning => self.plan_burn()?,
            FlightPhase::BurnOrientation => self.orient()?,
            FlightPhase::BurnWait => self.wait_for_burn()?,
            FlightPhase::BurnExecute => self.execute_burn()?,
            FlightPhase::Complete => FlightPhase::Complete,
        };

        self.transition_to(next)?;
        Ok(self.phase)
    }

    fn transition_to(&mut self, next: FlightPhase) -> Result<(), AutopilotError> {
        if next == self.phase {
            return Ok(());
        }
        if next < self.phase {
            return Err(AutopilotError::PhaseError(format!(
                "cannot go back from {:?} to {:?}",
                self.phase, next
            )));
        }
        let ut = self.vessel.ut()?;
        self.telemetry.record_transition(next, ut);
        self.phase = next;
        Ok(())
    }

    fn update_display(&mut self) -> Result<(), AutopilotError> {
        let readout = FlightReadout {
            thrust: self.vessel.thrust()?,
            apoapsis_altitude: self.vessel.apoapsis_altitude()?,
            periapsis_altitude: self.vessel.periapsis_altitude()?,
        };
        let altitude = self.vessel.mean_altitude()?;
        self.panel.show(&readout)?;
        self.telemetry.collect_data(altitude, &readout);
        Ok(())
    }

    fn run_staging(&mut self) -> Result<(), AutopilotError> {
        if self.stage_controller.autostage(&mut self.vessel)? {
            let stage = self.vessel.current_stage()?;
            let ut = self.vessel.ut()?;
            self.telemetry.record_staging(stage, ut);
        }
        let every = self.config.stage_stats_every;
        if every > 0 && self.ticks % every == 0 {
            self.stage_controller.show_stage_stats(&mut self.vessel)?;
        }
        Ok(())
    }

    fn current_plan(&self) -> Result<BurnPlan, AutopilotError> {
        self.plan.ok_or_else(|| {
            AutopilotError::PhaseError(format!(
                "no circularization burn planned in {:?}",
                self.phase
            ))
        })
    }

    fn current_node(&self) -> Result<NodeHandle, AutopilotError> {
        self.node.ok_or_else(|| {
            AutopilotError::PhaseError(format!("no maneuver node in {:?}", self.phase))
        })
    }

    fn pre_launch(&mut self) -> Result<FlightPhase, AutopilotError> {
        if !self.panel.launch_clicked()? {
            return Ok(FlightPhase::PreLaunch);
        }

        self.vessel.set_sas(false)?;
        self.vessel.set_rcs(false)?;
        self.vessel.set_throttle(1.0)?;

        for count in (1..=self.config.countdown_secs).rev() {
            info!("{}...", count);
            self.poller.sleep(Duration::from_secs(1), "counting down")?;
        }
        info!("Launch!");

        self.vessel.activate_next_stage()?;
        let stage = self.vessel.current_stage()?;
        let ut = self.vessel.ut()?;
        self.telemetry.record_staging(stage, ut);

        self.vessel.engage_autopilot()?;
        self.vessel
            .target_pitch_and_heading(90.0, self.gravity_turn.heading)?;
        Ok(FlightPhase::Ascent)
    }

    fn climb(&mut self) -> Result<FlightPhase, AutopilotError> {
        let altitude = self.vessel.mean_altitude()?;
        if let Some(pitch) = self.gravity_turn.update(altitude) {
            self.vessel
                .target_pitch_and_heading(pitch, self.gravity_turn.heading)?;
        }

        let apoapsis = self.vessel.apoapsis_altitude()?;
        if apoapsis > self.config.target_altitude * self.config.approach_fraction {
            info!("Approaching target apoapsis");
            self.vessel.set_throttle(self.config.approach_throttle)?;
            return Ok(FlightPhase::ApoapsisApproach);
        }

        if self.phase == FlightPhase::Ascent && altitude > self.gravity_turn.start_altitude {
            info!("Starting gravity turn at {:.0} m", altitude);
            return Ok(FlightPhase::GravityTurn);
        }
        Ok(self.phase)
    }

    fn approach_apoapsis(&mut self) -> Result<FlightPhase, AutopilotError> {
        if self.vessel.apoapsis_altitude()? >= self.config.target_altitude {
            info!("Target apoapsis reached");
            self.vessel.set_throttle(0.0)?;
            info!("Coasting out of atmosphere");
            return Ok(FlightPhase::CoastOutOfAtmosphere);
        }
        Ok(FlightPhase::ApoapsisApproach)
    }

    fn coast(&mut self) -> Result<FlightPhase, AutopilotError> {
        if self.vessel.mean_altitude()? >= self.config.exit_atmosphere_altitude {
            return Ok(FlightPhase::BurnPlanning);
        }
        Ok(FlightPhase::CoastOutOfAtmosphere)
    }

    fn plan_burn(&mut self) -> Result<FlightPhase, AutopilotError> {
        info!("Planning circularization burn");
        let mu = self.vessel.gravitational_parameter()?;
        let r = self.vessel.apoapsis()?;
        let a = self.vessel.semi_major_axis()?;
        let delta_v = maneuver::circularization_delta_v(mu, r, a)?;

        let burn_time = maneuver::burn_time(
            delta_v,
            self.vessel.mass()?,
            self.vessel.available_thrust()?,
            self.vessel.specific_impulse()?,
            self.config.standard_gravity,
        )?;

        let node_ut = self.vessel.ut()? + self.vessel.time_to_apoapsis()?;
        self.node = Some(self.vessel.add_node(node_ut, delta_v)?);
        self.plan = Some(BurnPlan {
            delta_v,
            burn_time,
            node_ut,
        });
        info!(
            "Circularization needs {:.1} m/s over {:.1} s",
            delta_v, burn_time
        );
        Ok(FlightPhase::BurnOrientation)
    }

    fn orient(&mut self) -> Result<FlightPhase, AutopilotError> {
        let plan = self.current_plan()?;
        let node = self.current_node()?;

        info!("Orientating ship for circularization burn");
        self.vessel.point_at_node(node)?;

        let ut = self.vessel.ut()?;
        if ut < plan.start_ut(ut, self.vessel.time_to_apoapsis()?) {
            self.vessel.wait_for_attitude()?;
        } else {
            warn!("Burn window already open, not waiting for attitude lock");
        }
        Ok(FlightPhase::BurnWait)
    }

    fn wait_for_burn(&mut self) -> Result<FlightPhase, AutopilotError> {
        let plan = self.current_plan()?;

        if !self.warped {
            info!("Waiting until circularization burn");
            let ut = self.vessel.ut()?;
            let warp_target =
                plan.start_ut(ut, self.vessel.time_to_apoapsis()?) - self.config.lead_time;
            if warp_target > ut {
                self.vessel.warp_to(warp_target)?;
            }
            self.warped = true;
            info!("Ready to execute burn");
        }

        if plan.window_open(self.vessel.time_to_apoapsis()?) {
            info!("Executing burn");
            self.vessel.set_throttle(1.0)?;
            return Ok(FlightPhase::BurnExecute);
        }
        Ok(FlightPhase::BurnWait)
    }

    fn execute_burn(&mut self) -> Result<FlightPhase, AutopilotError> {
        let periapsis = self.vessel.periapsis_altitude()?;
        let target = self.config.target_altitude;
        if !self.fine_tuning && periapsis > self.config.fine_tune_fraction * target {
            info!("Fine tuning");
            self.vessel.set_throttle(self.config.fine_tune_throttle)?;
            self.fine_tuning = true;
        }

        if periapsis > self.config.complete_fraction * target {
            self.vessel.set_throttle(0.0)?;
            let node = self.current_node()?;
            self.vessel.remove_node(node)?;
            self.node = None;
            info!("Launch complete");
            return Ok(FlightPhase::Complete);
        }
        Ok(FlightPhase::BurnExecute)
    }
}
