//! Bounding Volume Hierarchies
//!
//! For optimizing computations

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use rand::{Rng, RngCore};

use crate::aabb::Aabb;
use crate::objects::{HitRecord, Hittable, HittableList, HittableObj};
use crate::{Error, Ray, Result};

/// Bounding Volume Hierarchy
///
/// Binary tree over the scene's objects. A node's box always surrounds both children's boxes.
pub struct BvhNode {
    left: HittableObj,
    // A leaf holding one object points both children at it
    right: HittableObj,
    bbox: Aabb,
}
impl BvhNode {
    /// Build the tree over `list`, bounding moving objects over `[time0, time1]`
    ///
    /// Split axes are drawn from `rng`, so a seeded generator reproduces the same tree.
    pub fn new(list: HittableList, time0: f64, time1: f64, rng: &mut dyn RngCore) -> Result<Self> {
        if list.is_empty() {
            return Err(Error::EmptyScene);
        }
        let count = list.len();
        let node = Self::split_tree(list, time0, time1, rng)?;
        debug!("Built bounding volume hierarchy over {count} objects");
        Ok(node)
    }

    /// Split the tree
    ///
    /// Randomly choose an axis, sort the primitives, put half in each subtree
    fn split_tree(
        mut objects: HittableList,
        time0: f64,
        time1: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        let axis = rng.gen_range(0..=2);

        // Every object needs a box; fetching them up front also fails fast on unbounded ones
        let mut keyed = objects
            .0
            .drain(..)
            .map(|obj| {
                let bbox = obj.try_bounding_box(time0, time1).ok_or(Error::Unbounded)?;
                Ok((bbox.min[axis], obj))
            })
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by(|a, b| box_compare(a.0, b.0));

        let (left, right): (HittableObj, HittableObj) = match keyed.len() {
            0 => return Err(Error::EmptyScene),
            1 => {
                // There is only one object, both left and right must be the same
                let (_, only) = keyed.remove(0);
                (only.clone(), only)
            }
            2 => {
                // There are two objects, already ordered
                let (_, second) = keyed.remove(1);
                let (_, first) = keyed.remove(0);
                (first, second)
            }
            len => {
                // There are many objects, split at the midpoint and call again
                let right_half = keyed.split_off(len / 2);
                let left_list: HittableList = keyed.into_iter().map(|(_, obj)| obj).collect();
                let right_list: HittableList = right_half.into_iter().map(|(_, obj)| obj).collect();

                let left = BvhNode::split_tree(left_list, time0, time1, rng)?;
                let right = BvhNode::split_tree(right_list, time0, time1, rng)?;
                (Arc::new(left), Arc::new(right))
            }
        };

        let box_left = left.try_bounding_box(time0, time1).ok_or(Error::Unbounded)?;
        let box_right = right.try_bounding_box(time0, time1).ok_or(Error::Unbounded)?;
        Ok(Self {
            left,
            right,
            bbox: box_left.surrounding_box(&box_right),
        })
    }
}
impl Hittable for BvhNode {
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        if !self.bbox.hit(ray, t_min, t_max) {
            return None;
        }
        let hit_left = self.left.try_hit(ray, t_min, t_max, rng);
        if Arc::ptr_eq(&self.left, &self.right) {
            return hit_left;
        }
        let right_max = hit_left.as_ref().map_or(t_max, |rec| rec.t);
        let hit_right = self.right.try_hit(ray, t_min, right_max, rng);
        // Only a strictly closer hit on the right can replace the left one
        match (hit_left, hit_right) {
            (Some(left), Some(right)) if right.t < left.t => Some(right),
            (Some(left), _) => Some(left),
            (None, right) => right,
        }
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(self.bbox.clone())
    }
}

/// Compare boxes by their minimum coordinate on the split axis
fn box_compare(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}
