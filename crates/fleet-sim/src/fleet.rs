//! The `Fleet` struct and its tick loop.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, error, info, warn};

use fleet_core::{FleetConfig, RobotId, Tick, VertexId};
use fleet_graph::{GraphError, NavGraph, Router};
use fleet_robot::{Robot, RobotState};
use fleet_traffic::{Acquire, Release, ReservationTable, Resource, TrafficError};

use crate::{
    Command, CommandOutcome, CommandOutput, CommandSender, FleetError, FleetObserver,
    FleetResult, NoopObserver, RobotStatus, StatusCounts, TickReport,
};

/// What one robot did during a tick.
#[derive(Default)]
struct Step {
    moved:   bool,
    arrived: Option<VertexId>,
    charged: bool,
}

/// The fleet orchestrator.
///
/// Owns every robot and the reservation table.  All mutation goes through
/// its methods, and queued [`Command`]s are applied only between robot
/// steps, so there is exactly one writer for reservation state.
///
/// Invariants held between ticks:
/// - a robot at a vertex holds that vertex;
/// - a robot on a lane holds that lane;
/// - a `Waiting` robot sits in the wait queue of its `awaiting` resource,
///   or holds it already and will move on its next step.
///
/// Create via [`FleetBuilder`][crate::FleetBuilder].
pub struct Fleet<R: Router> {
    config:       FleetConfig,
    now:          Tick,
    graph:        Arc<NavGraph>,
    router:       R,
    /// Keyed by id so iteration is in ascending id order.
    robots:       BTreeMap<RobotId, Robot>,
    reservations: ReservationTable,
    next_id:      u32,
    /// Commands from [`Fleet::submit`].
    pending:      VecDeque<Command>,
    inbox:        Receiver<Command>,
    outbox:       Sender<Command>,
}

impl<R: Router> Fleet<R> {
    pub(crate) fn new(config: FleetConfig, graph: Arc<NavGraph>, router: R) -> Self {
        let (outbox, inbox) = mpsc::channel();
        Self {
            config,
            now: Tick::ZERO,
            graph,
            router,
            robots: BTreeMap::new(),
            reservations: ReservationTable::new(),
            next_id: 0,
            pending: VecDeque::new(),
            inbox,
            outbox,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// The tick the next call to [`tick`](Self::tick) will process.
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn graph(&self) -> &Arc<NavGraph> {
        &self.graph
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn reservations(&self) -> &ReservationTable {
        &self.reservations
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(&id)
    }

    /// All robots in ascending id order.
    pub fn robots(&self) -> impl Iterator<Item = &Robot> + '_ {
        self.robots.values()
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Create an `Idle` robot at `vertex` and reserve the vertex for it.
    ///
    /// # Errors
    ///
    /// [`FleetError::VertexNotFound`], or [`FleetError::VertexOccupied`]
    /// when another robot stands on or holds `vertex`.
    pub fn spawn_robot(&mut self, vertex: VertexId) -> FleetResult<RobotId> {
        if !self.graph.contains_vertex(vertex) {
            return Err(FleetError::VertexNotFound(vertex));
        }
        let occupant = self
            .robot_at_vertex(vertex)
            .or_else(|| self.reservations.holder(Resource::Vertex(vertex)));
        if let Some(occupant) = occupant {
            return Err(FleetError::VertexOccupied { vertex, occupant });
        }

        let id = RobotId(self.next_id);
        self.next_id += 1;
        let granted = self.reservations.acquire(Resource::Vertex(vertex), id);
        debug_assert_eq!(granted, Acquire::Granted);
        self.robots.insert(id, Robot::spawn(id, vertex));
        info!(robot = %id, %vertex, "robot spawned");
        Ok(id)
    }

    /// Route `robot` to `destination`, replacing any path it had.
    ///
    /// A robot on a lane finishes that lane first.  Reservations the new
    /// path no longer needs are given back or their queue entries
    /// withdrawn.  A charging robot keeps charging and sets off once it is
    /// done.
    ///
    /// # Errors
    ///
    /// [`FleetError::RobotNotFound`], [`FleetError::VertexNotFound`], or
    /// [`FleetError::NoPathFound`].  The robot is untouched on error.
    pub fn assign_destination(&mut self, robot: RobotId, destination: VertexId) -> FleetResult<()> {
        let r = self.robots.get_mut(&robot).ok_or(FleetError::RobotNotFound(robot))?;
        if !self.graph.contains_vertex(destination) {
            return Err(FleetError::VertexNotFound(destination));
        }

        let origin = r.plan_origin(&self.graph);
        let route = self
            .router
            .route(&self.graph, origin, destination)
            .map_err(|e| match e {
                GraphError::NoRoute { .. } => FleetError::NoPathFound { robot, from: origin, to: destination },
                GraphError::VertexNotFound(v) => FleetError::VertexNotFound(v),
                other => FleetError::Graph(other),
            })?;
        let hops = route.hops();

        let previous = r.awaiting;
        r.assign(destination, route);
        let next = r.next_resource(&self.graph);

        let mut release = None;
        if let Some(prev) = previous {
            let holds_prev = self.reservations.holder(prev) == Some(robot);
            if Some(prev) == next {
                if !holds_prev {
                    r.wait_on(prev);
                }
            } else {
                r.awaiting = None;
                if holds_prev {
                    release = Some(
                        self.reservations
                            .release(prev, robot)
                            .map_err(|e| invariant_violation(robot, e))?,
                    );
                } else {
                    self.reservations.cancel(prev, robot);
                }
            }
        }

        info!(%robot, %destination, hops, state = %r.state, "destination assigned");
        if let Some(release) = release {
            self.hand_over(release);
        }
        Ok(())
    }

    /// Start charging `robot` at its current vertex.
    ///
    /// # Errors
    ///
    /// [`FleetError::RobotNotFound`], [`FleetError::CurrentlyMoving`], or
    /// [`FleetError::NotAtChargingStation`].
    pub fn charge_robot(&mut self, robot: RobotId) -> FleetResult<()> {
        let r = self.robots.get_mut(&robot).ok_or(FleetError::RobotNotFound(robot))?;
        let at_station = self.graph.is_charging_station(r.current_vertex);
        r.begin_charging(at_station)?;
        info!(%robot, vertex = %r.current_vertex, level = r.charge_level.unwrap_or(0), "charging started");
        Ok(())
    }

    /// End charging early.  The robot picks up a destination assigned while
    /// it was charging, or goes `Idle`.
    ///
    /// # Errors
    ///
    /// [`FleetError::RobotNotFound`] or [`FleetError::NotCharging`].
    pub fn stop_charge(&mut self, robot: RobotId) -> FleetResult<()> {
        let r = self.robots.get_mut(&robot).ok_or(FleetError::RobotNotFound(robot))?;
        r.stop_charging()?;
        info!(%robot, level = r.charge_level.unwrap_or(0), state = %r.state, "charging stopped");
        Ok(())
    }

    /// Queue `command` for the start of the next tick.
    pub fn submit(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// A handle other threads can queue commands through.
    pub fn command_sender(&self) -> CommandSender {
        CommandSender::new(self.outbox.clone())
    }

    /// Number of commands waiting for the next tick.
    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    /// Remove every robot and reservation.  Queued commands are dropped.
    pub fn despawn_all(&mut self) {
        let count = self.robots.len();
        self.robots.clear();
        self.reservations.clear();
        self.pending.clear();
        while self.inbox.try_recv().is_ok() {}
        info!(count, "fleet cleared");
    }

    // ── Status ────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// [`FleetError::RobotNotFound`].
    pub fn get_status(&self, robot: RobotId) -> FleetResult<RobotStatus> {
        self.robots
            .get(&robot)
            .map(|r| self.status_of(r))
            .ok_or(FleetError::RobotNotFound(robot))
    }

    /// Every robot's status in ascending id order.
    pub fn list_robots(&self) -> Vec<RobotStatus> {
        self.robots.values().map(|r| self.status_of(r)).collect()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for r in self.robots.values() {
            counts.record(r.state);
        }
        counts
    }

    /// The robot standing on `vertex`, if any.  Robots on lanes leaving
    /// `vertex` do not count.
    pub fn robot_at_vertex(&self, vertex: VertexId) -> Option<RobotId> {
        self.robots
            .values()
            .find(|r| !r.is_traversing() && r.current_vertex == vertex)
            .map(|r| r.id)
    }

    fn status_of(&self, r: &Robot) -> RobotStatus {
        let waiting_for = r.awaiting.filter(|_| r.state == RobotState::Waiting);
        RobotStatus {
            id:             r.id,
            state:          r.state,
            current_vertex: r.current_vertex,
            current_lane:   r.current_lane,
            destination:    r.destination,
            remaining_hops: r.remaining_hops(),
            waiting_for,
            queue_position: waiting_for.and_then(|res| self.reservations.queue_position(res, r.id)),
            blocked_by:     waiting_for
                .and_then(|res| self.reservations.holder(res))
                .filter(|&h| h != r.id),
            charge_level:   r.charge_level,
            position:       r.position(&self.graph),
        }
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the simulation by one tick.
    ///
    /// # Errors
    ///
    /// Only fatal errors ([`FleetError::is_fatal`]).  Rejected commands are
    /// reported in the returned [`TickReport`].
    pub fn tick(&mut self) -> FleetResult<TickReport> {
        self.tick_with(&mut NoopObserver)
    }

    /// [`tick`](Self::tick) with observer callbacks.
    pub fn tick_with<O: FleetObserver>(&mut self, observer: &mut O) -> FleetResult<TickReport> {
        let now = self.now;
        observer.on_tick_start(now);
        let report = self.process_tick(now, observer)?;
        observer.on_tick_end(now, &report);
        let interval = self.config.output_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.list_robots());
        }
        self.now = now.next();
        Ok(report)
    }

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: FleetObserver>(&mut self, observer: &mut O) -> FleetResult<()> {
        while self.now < self.config.end_tick() {
            self.tick_with(observer)?;
        }
        observer.on_sim_end(self.now);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: FleetObserver>(&mut self, n: u64, observer: &mut O) -> FleetResult<()> {
        for _ in 0..n {
            self.tick_with(observer)?;
        }
        Ok(())
    }

    fn process_tick<O: FleetObserver>(&mut self, now: Tick, observer: &mut O) -> FleetResult<TickReport> {
        let mut report = TickReport::new(now);

        // ── Phase 1: queued commands ──────────────────────────────────────
        self.pending.extend(self.inbox.try_iter());
        while let Some(command) = self.pending.pop_front() {
            let result = match self.apply(command) {
                Err(e) if e.is_fatal() => return Err(e),
                other => other,
            };
            if let Err(e) = &result {
                warn!(%command, error = %e, "command rejected");
            }
            let outcome = CommandOutcome { command, result };
            observer.on_command(now, &outcome);
            report.commands.push(outcome);
        }

        // ── Phase 2: robots in ascending id order ─────────────────────────
        //
        // A robot handed a resource by an earlier robot this tick moves in
        // this same tick if its id is higher, otherwise on the next one.
        let ids: Vec<RobotId> = self.robots.keys().copied().collect();
        let mut woken = Vec::new();
        for id in ids {
            let step = self.step_robot(id, &mut woken)?;
            if step.moved {
                report.moved.push(id);
            }
            if let Some(vertex) = step.arrived {
                info!(robot = %id, %vertex, tick = %now, "arrived");
                observer.on_arrival(now, id, vertex);
                report.arrivals.push((id, vertex));
            }
            if step.charged {
                report.fully_charged.push(id);
            }
            for release in woken.drain(..) {
                self.hand_over(release);
            }
        }

        report.counts = self.status_counts();
        debug!(
            tick = %now,
            moved = report.moved.len(),
            waiting = report.counts.waiting,
            "tick done"
        );
        Ok(report)
    }

    fn apply(&mut self, command: Command) -> FleetResult<CommandOutput> {
        match command {
            Command::Spawn { vertex } => self.spawn_robot(vertex).map(CommandOutput::Spawned),
            Command::AssignDestination { robot, vertex } => {
                self.assign_destination(robot, vertex).map(|()| CommandOutput::Accepted)
            }
            Command::Charge { robot } => self.charge_robot(robot).map(|()| CommandOutput::Accepted),
            Command::StopCharge { robot } => self.stop_charge(robot).map(|()| CommandOutput::Accepted),
        }
    }

    /// Advance one robot by at most one lane.  Releases that hand a
    /// resource to another robot are pushed onto `woken`.
    fn step_robot(&mut self, id: RobotId, woken: &mut Vec<Release>) -> FleetResult<Step> {
        let mut step = Step::default();
        let Some(r) = self.robots.get_mut(&id) else {
            return Ok(step);
        };

        match r.state {
            RobotState::Charging => {
                if r.charge_step(self.config.charge_per_tick) {
                    info!(robot = %id, state = %r.state, "fully charged");
                    step.charged = true;
                    if r.state == RobotState::Arrived {
                        step.arrived = Some(r.current_vertex);
                    }
                }
                return Ok(step);
            }
            RobotState::Waiting => match r.awaiting {
                Some(res) if self.reservations.holder(res) == Some(id) => r.wake(),
                _ => return Ok(step),
            },
            RobotState::Moving => {}
            RobotState::Idle | RobotState::Arrived => return Ok(step),
        }

        // At a vertex: take the next lane, then give up the vertex.
        let lane = match r.current_lane {
            Some(lane) => lane,
            None => {
                let Some(&lane) = r.path.front() else {
                    return Ok(step);
                };
                let res = Resource::Lane(lane);
                if let Acquire::Enqueued { position } = self.reservations.acquire(res, id) {
                    debug!(robot = %id, %lane, position, "waiting for lane");
                    r.wait_on(res);
                    return Ok(step);
                }
                let left = r.current_vertex;
                r.enter_lane(lane);
                step.moved = true;
                let release = self
                    .reservations
                    .release(Resource::Vertex(left), id)
                    .map_err(|e| invariant_violation(id, e))?;
                woken.push(release);
                debug!(robot = %id, %lane, from = %left, "entered lane");
                lane
            }
        };

        // On a lane: take its end vertex, then give up the lane.
        let to = self
            .graph
            .lane(lane)
            .map(|l| l.to)
            .ok_or(FleetError::UnknownLane(lane))?;
        let res = Resource::Vertex(to);
        if let Acquire::Enqueued { position } = self.reservations.acquire(res, id) {
            debug!(robot = %id, vertex = %to, position, "waiting for vertex");
            r.wait_on(res);
            return Ok(step);
        }
        r.exit_lane(to);
        step.moved = true;
        let release = self
            .reservations
            .release(Resource::Lane(lane), id)
            .map_err(|e| invariant_violation(id, e))?;
        woken.push(release);
        debug!(robot = %id, %lane, vertex = %to, "left lane");
        if r.state == RobotState::Arrived {
            step.arrived = Some(to);
        }
        Ok(step)
    }

    /// Wake the robot a release handed its resource to.
    fn hand_over(&mut self, release: Release) {
        if let Release::NextGranted(next) = release {
            if let Some(r) = self.robots.get_mut(&next) {
                r.wake();
                debug!(robot = %next, "woken");
            }
        }
    }
}

fn invariant_violation(robot: RobotId, e: TrafficError) -> FleetError {
    error!(%robot, error = %e, "reservation invariant violated");
    FleetError::ReservationInvariantViolation(e)
}
