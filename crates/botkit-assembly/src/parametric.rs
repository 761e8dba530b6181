//! Socket recomputation for parametric resizes.

use botkit_ir::{Category, Dims, Socket};

/// Coordinates closer than this to the part center count as centered.
const CENTER_EPSILON: f64 = 0.01;

/// Recompute socket positions for a part resized to `dims` (L, W, H).
///
/// Chassis and platform sockets follow their names: `front`/`back` go to the
/// ±L/2 faces on x, `left`/`right` to the ±W/2 faces on z, and sockets above
/// the center to the H/2 top face. On a chassis a face rule only touches a
/// socket that already sits off-center on that axis. Other categories keep
/// their sockets as they are. Ids, kinds and rotations never change.
pub fn recalculate_sockets(category: Category, sockets: &[Socket], dims: Dims) -> Vec<Socket> {
    let mut sockets = sockets.to_vec();
    match category {
        Category::Chassis => sockets.iter_mut().for_each(|s| reposition_chassis(s, dims)),
        Category::Platform => sockets.iter_mut().for_each(|s| reposition_platform(s, dims)),
        _ => {}
    }
    sockets
}

fn reposition_chassis(socket: &mut Socket, [len, width, height]: Dims) {
    let [x, y, z] = socket.position;
    if x.abs() > CENTER_EPSILON {
        if socket.id.contains("front") {
            socket.position[0] = len / 2.0;
        }
        if socket.id.contains("back") {
            socket.position[0] = -len / 2.0;
        }
    }
    if z.abs() > CENTER_EPSILON {
        if socket.id.contains("left") {
            socket.position[2] = width / 2.0;
        }
        if socket.id.contains("right") {
            socket.position[2] = -width / 2.0;
        }
    }
    if (socket.id.contains("top") || y.abs() > CENTER_EPSILON) && y > 0.0 {
        socket.position[1] = height / 2.0;
    }
}

fn reposition_platform(socket: &mut Socket, [len, width, height]: Dims) {
    if socket.id.contains("front") {
        socket.position[0] = len / 2.0;
    }
    if socket.id.contains("back") {
        socket.position[0] = -len / 2.0;
    }
    if socket.id.contains("left") {
        socket.position[2] = width / 2.0;
    }
    if socket.id.contains("right") {
        socket.position[2] = -width / 2.0;
    }
    if socket.position[1] > 0.0 {
        socket.position[1] = height / 2.0;
    }
}
