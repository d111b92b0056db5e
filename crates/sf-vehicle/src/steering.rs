//! Tractor front-axle steering model.
//!
//! The steering request is scaled, delayed and passed through a first-order
//! lag whose time constant is clamped to `[0.001, 10]` s. The resulting front
//! wheel angle is differentiated and split into right/left wheel angles with
//! the pinpoint (Ackermann) relation. Everything is published as one bus.

use sf_blocks::{BlockPorts, BlockResult, Model, ModelBuilder};
use sf_core::{Node, SignalMap, Value};

pub const WHEELBASE: &str = "tractor_wheelbase";
pub const TRACK_WIDTH: &str = "tractor_Width";
pub const TIME_CONSTANT: &str = "front_wheel_ang_t_const";
pub const DEAD_TIME: &str = "front_wheel_ang_delay";
pub const GAIN: &str = "front_wheel_ang_gain";
pub const INIT_VALUE: &str = "front_wheel_ang_init_value";

pub const DEFAULT_REQUEST: &str = "front_wheel_angle_Rq";
pub const DEFAULT_INFO: &str = "steering_info";

/// Signals packed into the steering bus, in bus order.
pub const INFO_SIGNALS: [&str; 6] = [
    "front_wheel_angle",
    "front_wheel_angle_rate",
    "front_wheel_angle_neg",
    "front_wheel_angle_rate_neg",
    "AxFr_front_right",
    "AxFr_front_left",
];

/// Bounds of the lag time constant in seconds.
pub const TIME_CONSTANT_RANGE: (f64, f64) = (0.001, 10.0);

/// Nominal tractor parameters.
pub fn default_parameters() -> SignalMap {
    [
        (WHEELBASE, 5.8325),
        (TRACK_WIDTH, 2.5),
        (TIME_CONSTANT, 0.1),
        (DEAD_TIME, 0.02),
        (GAIN, 1.0),
        (INIT_VALUE, 0.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), Value::scalar(v)))
    .collect()
}

/// First-order lag `y' = (u - y) / tau` with `y(0)` latched from `y0`.
pub fn pt(
    b: &mut ModelBuilder,
    y_in: impl Into<Node>,
    tau: impl Into<Node>,
    y0: impl Into<Node>,
    y_out: impl Into<Node>,
) -> BlockResult<BlockPorts> {
    let inputs: [Node; 3] = [y_in.into(), tau.into(), y0.into()];
    b.submodel("PT", inputs, [y_out.into()], |b, p| {
        let (y_in, tau, y0) = (p.inputs[0].clone(), p.inputs[1].clone(), p.inputs[2].clone());
        let y_out = p.output()?;

        b.add_sub("+-1", "+-", [y_in, y_out.clone()], Node::local("001"))?;
        b.mul_div("*/1", "*/", [Node::local("001"), tau], Node::local("002"))?;
        b.integrator("Int", Node::local("002"), Node::auto(), 0.0)?;
        b.initial_value("IV", y0, Node::local("003"))?;
        b.add_sub("+-2", "++", [Node::auto(), Node::local("003")], y_out)?;
        Ok(())
    })
}

/// Right and left wheel angles for a front wheel angle, pinpoint steering.
pub fn pinpoint(
    b: &mut ModelBuilder,
    angle: impl Into<Node>,
    right: impl Into<Node>,
    left: impl Into<Node>,
) -> BlockResult<BlockPorts> {
    let outputs: [Node; 2] = [right.into(), left.into()];
    b.submodel("ComputeFrontWheelAngleRightLeftPinpoint", [angle.into()], outputs, |b, p| {
        let angle = p.inputs[0].clone();
        let (right, left) = (p.outputs[0].clone(), p.outputs[1].clone());

        // turning radius of the axle centre
        b.mul_div("*/1", "*/", [Node::from(WHEELBASE), angle], Node::auto())?;
        b.add_sub("+-1", "++", [Node::auto(), Node::from(TRACK_WIDTH)], Node::local("004"))?;
        b.mul_div("*/2", "*/", [Node::from(WHEELBASE), Node::local("004")], right)?;
        b.gain("K", TRACK_WIDTH, Node::local("005"), 0.5)?;
        b.add_sub("+-2", "+-", [Node::auto(), Node::local("005")], Node::local("006"))?;
        b.mul_div("*/3", "*/", [Node::from(WHEELBASE), Node::local("006")], left)?;
        Ok(())
    })
}

/// Add the `Steering_System` submodel mapping `request` onto the bus `info`.
pub fn build_steering_system(
    b: &mut ModelBuilder,
    request: impl Into<Node>,
    info: impl Into<Node>,
) -> BlockResult<BlockPorts> {
    b.submodel("Steering_System", [request.into()], [info.into()], |b, p| {
        let request = p.inputs[0].clone();
        let info = p.output()?;
        let [angle, rate, angle_neg, rate_neg, right, left] = INFO_SIGNALS;

        b.mul_div("*/", "**", [request, Node::from(GAIN)], Node::local("007"))?;
        b.delay("Delay", Node::local("007"), DEAD_TIME, INIT_VALUE, Node::auto())?;
        let (lo, hi) = TIME_CONSTANT_RANGE;
        b.function("Clamp", TIME_CONSTANT, Node::local("008"), move |_, tau| tau.clamp(lo, hi))?;
        // delayed request drives the lag and seeds its initial value
        pt(b, Node::auto(), Node::local("008"), Node::auto(), angle)?;

        b.derivative("Derivative", angle, rate, 0.0)?;
        b.gain("K1", angle, angle_neg, -1.0)?;
        b.gain("K2", rate, rate_neg, -1.0)?;
        pinpoint(b, angle, right, left)?;

        b.bus("Bus", INFO_SIGNALS, info)?;
        Ok(())
    })
}

/// Complete steering model with its own root scope.
pub fn steering_model(
    seed: u64,
    request: impl Into<Node>,
    info: impl Into<Node>,
) -> BlockResult<Model> {
    let mut b = ModelBuilder::new().with_seed(seed);
    build_steering_system(&mut b, request, info)?;
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_cover_every_external_signal_but_the_request() {
        let model = steering_model(1, DEFAULT_REQUEST, DEFAULT_INFO).unwrap();
        let params = default_parameters();
        let mut expected: Vec<&str> = params.keys().map(String::as_str).collect();
        expected.push(DEFAULT_REQUEST);
        expected.sort_unstable();
        let external = model.external_inputs();
        assert_eq!(external.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn internal_signals_are_scoped() {
        let model = steering_model(1, DEFAULT_REQUEST, DEFAULT_INFO).unwrap();
        let outputs = model.outputs();
        assert!(outputs.contains("-Steering_System.007"));
        assert!(outputs.contains("-Steering_System.PT.001"));
        assert!(outputs.contains("-Steering_System.ComputeFrontWheelAngleRightLeftPinpoint.006"));
        for name in INFO_SIGNALS {
            assert!(outputs.contains(name), "{name}");
        }
        assert!(outputs.contains(DEFAULT_INFO));
    }
}
