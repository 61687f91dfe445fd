//! Rotate gesture.

use diagramkit_core::{ObjectId, Point, Result, Vector};

use crate::collection::GraphicalObjectCollection;

/// Default snap step in degrees.
pub const DEFAULT_ROTATION_SNAP: f64 = 15.0;

/// Rotates one entity to follow the pointer around its center; the other
/// selected entities receive the same angle delta on completion.
#[derive(Debug, Clone)]
pub struct RotateGesture {
    item: ObjectId,
    others: Vec<ObjectId>,
    center: Point,
    start_vector: Vector,
    initial_angle: f64,
    snap_step: f64,
    delta: f64,
}

impl RotateGesture {
    /// Starts rotating `item` from pointer position `pointer` (canvas
    /// coordinates). `others` are the remaining selected entities.
    pub fn begin(
        collection: &GraphicalObjectCollection,
        item: ObjectId,
        others: Vec<ObjectId>,
        pointer: Point,
        snap_step: f64,
    ) -> Option<Self> {
        let entity = collection.get_entity(item)?;
        let center = entity.center();
        Some(Self {
            item,
            others: others.into_iter().filter(|id| *id != item).collect(),
            center,
            start_vector: pointer - center,
            initial_angle: entity.angle(),
            snap_step,
            delta: 0.0,
        })
    }

    pub fn item(&self) -> ObjectId {
        self.item
    }

    pub fn initial_angle(&self) -> f64 {
        self.initial_angle
    }

    /// Angle added since the gesture started, in degrees.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Follows the pointer. With `snap`, the resulting absolute angle is a
    /// multiple of the snap step.
    pub fn update(
        &mut self,
        collection: &mut GraphicalObjectCollection,
        pointer: Point,
        snap: bool,
    ) -> Result<f64> {
        let current = pointer - self.center;
        let mut delta = Vector::angle_between(self.start_vector, current);
        if snap && self.snap_step > 0.0 {
            let absolute = self.initial_angle + delta;
            delta = (absolute / self.snap_step).round() * self.snap_step - self.initial_angle;
        }
        self.delta = delta;
        let angle = self.initial_angle + delta;
        collection.modify_entity(self.item, |e| e.set_angle(angle))?;
        tracing::trace!("Rotate tick, delta {:.2}", delta);
        Ok(delta)
    }

    /// Applies the final delta to the other selected entities.
    pub fn complete(self, collection: &mut GraphicalObjectCollection) -> Result<()> {
        if self.delta != 0.0 {
            for id in &self.others {
                let delta = self.delta;
                collection.modify_entity(*id, |e| e.set_angle(e.angle() + delta))?;
            }
        }
        tracing::debug!("Rotate completed, delta {:.2}", self.delta);
        Ok(())
    }

    /// Restores the initial angle.
    pub fn cancel(self, collection: &mut GraphicalObjectCollection) -> Result<()> {
        let angle = self.initial_angle;
        collection.modify_entity(self.item, |e| e.set_angle(angle))?;
        Ok(())
    }
}
