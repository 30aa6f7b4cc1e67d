use crate::errors::{PlonkError, Result};
use noah_algebra::prelude::*;

/// Variable index into the solution vector.
pub type VarIndex = usize;

/// One gate of the sparse rank-1 constraint system: a triple of wires
/// together with the gate coefficients. The gate equation is
/// `ql * xl + qr * xr + qm * xl * xr + qo * xo + qk = 0`,
/// where `xl`, `xr`, `xo` are the values of the wired variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseConstraint<F> {
    /// The left wire.
    pub l: VarIndex,
    /// The right wire.
    pub r: VarIndex,
    /// The output wire.
    pub o: VarIndex,
    /// The left selector coefficient.
    pub ql: F,
    /// The right selector coefficient.
    pub qr: F,
    /// The multiplication selector coefficient.
    pub qm: F,
    /// The output selector coefficient.
    pub qo: F,
    /// The constant selector coefficient.
    pub qk: F,
}

impl<F: Scalar> SparseConstraint<F> {
    /// A gate constraining `xl + xr = xo`.
    pub fn add_gate(l: VarIndex, r: VarIndex, o: VarIndex) -> Self {
        Self {
            l,
            r,
            o,
            ql: F::one(),
            qr: F::one(),
            qm: F::zero(),
            qo: F::one().neg(),
            qk: F::zero(),
        }
    }

    /// A gate constraining `xl * xr = xo`.
    pub fn mul_gate(l: VarIndex, r: VarIndex, o: VarIndex) -> Self {
        Self {
            l,
            r,
            o,
            ql: F::zero(),
            qr: F::zero(),
            qm: F::one(),
            qo: F::one().neg(),
            qk: F::zero(),
        }
    }

    /// A gate pinning `xl` to the given constant.
    pub fn constant_gate(l: VarIndex, value: F) -> Self {
        Self {
            l,
            r: 0,
            o: 0,
            ql: F::one(),
            qr: F::zero(),
            qm: F::zero(),
            qo: F::zero(),
            qk: value.neg(),
        }
    }

    /// Evaluate the gate equation on the wired values.
    pub fn eval(&self, xl: &F, xr: &F, xo: &F) -> F {
        let mut acc = self.ql.mul(xl);
        acc.add_assign(&self.qr.mul(xr));
        acc.add_assign(&self.qm.mul(xl).mul(xr));
        acc.add_assign(&self.qo.mul(xo));
        acc.add_assign(&self.qk);
        acc
    }
}

/// A sparse rank-1 constraint system. The first `nb_public_variables`
/// variables are the public inputs; they occupy the leading rows of the
/// evaluation domain and enter the argument only through the left wire.
/// Constraints and assertions follow, then padding rows wired to variable 0.
#[derive(Clone, Debug, Default)]
pub struct SparseR1CS<F> {
    /// Number of public input variables.
    pub nb_public_variables: usize,
    /// The gate constraints.
    pub constraints: Vec<SparseConstraint<F>>,
    /// The gate assertions, checked like constraints but kept apart so a
    /// front end can distinguish solved gates from asserted ones.
    pub assertions: Vec<SparseConstraint<F>>,
}

impl<F: Scalar> SparseR1CS<F> {
    /// Create an empty system with the given number of public variables.
    pub fn new(nb_public_variables: usize) -> Self {
        Self {
            nb_public_variables,
            constraints: Vec::new(),
            assertions: Vec::new(),
        }
    }

    /// Append a constraint.
    pub fn add_constraint(&mut self, constraint: SparseConstraint<F>) {
        self.constraints.push(constraint);
    }

    /// Append an assertion.
    pub fn add_assertion(&mut self, assertion: SparseConstraint<F>) {
        self.assertions.push(assertion);
    }

    /// Number of rows occupied before padding: public inputs, constraints,
    /// assertions.
    pub fn size(&self) -> usize {
        self.nb_public_variables + self.constraints.len() + self.assertions.len()
    }

    /// The evaluation domain cardinality: `size()` rounded up to a power of
    /// two, at least two.
    pub fn eval_domain_size(&self) -> usize {
        self.size().next_power_of_two().max(2)
    }

    /// Number of variables referenced by the system.
    pub fn num_vars(&self) -> usize {
        let mut n = self.nb_public_variables.max(1);
        for c in self.constraints.iter().chain(self.assertions.iter()) {
            n = n.max(c.l + 1).max(c.r + 1).max(c.o + 1);
        }
        n
    }

    /// Check the witness against every gate and return the solution vector.
    /// The witness is the full assignment, `[public | rest]`.
    pub fn solve(&self, full_witness: &[F]) -> Result<Vec<F>> {
        if full_witness.len() < self.num_vars() {
            return Err(PlonkError::FuncParamsError);
        }
        for c in self.constraints.iter().chain(self.assertions.iter()) {
            let value = c.eval(&full_witness[c.l], &full_witness[c.r], &full_witness[c.o]);
            if !value.is_zero() {
                return Err(PlonkError::ProofErrorInvalidWitness);
            }
        }
        Ok(full_witness.to_vec())
    }

    /// The variable wired to each of the `m` rows, per column. Public rows
    /// wire the public variable on the left and variable 0 elsewhere; padding
    /// rows wire variable 0 everywhere. The wire extractor and the
    /// copy-constraint permutation both read this map, so they cannot
    /// diverge.
    pub fn wire_assignment(&self, m: usize) -> [Vec<VarIndex>; 3] {
        assert!(m >= self.size());
        let mut wl = Vec::with_capacity(m);
        let mut wr = Vec::with_capacity(m);
        let mut wo = Vec::with_capacity(m);
        for i in 0..self.nb_public_variables {
            wl.push(i);
            wr.push(0);
            wo.push(0);
        }
        for c in self.constraints.iter().chain(self.assertions.iter()) {
            wl.push(c.l);
            wr.push(c.r);
            wo.push(c.o);
        }
        for _ in self.size()..m {
            wl.push(0);
            wr.push(0);
            wo.push(0);
        }
        [wl, wr, wo]
    }

    /// Compute the copy-constraint permutation over the `3 * m` wire slots
    /// (columns flattened as `[left | right | output]`). Slots wiring the
    /// same variable form one cycle each.
    pub fn compute_permutation(&self, m: usize) -> Vec<usize> {
        let [wl, wr, wo] = self.wire_assignment(m);
        let mut v = Vec::with_capacity(3 * m);
        v.extend_from_slice(&wl);
        v.extend_from_slice(&wr);
        v.extend_from_slice(&wo);

        let mut perm = vec![0usize; 3 * m];
        let mut marked = vec![false; self.num_vars()];
        // for each unmarked variable, link all slots holding it into a cycle
        for (i, value) in v.iter().enumerate() {
            if marked[*value] {
                continue;
            }
            let first = i;
            let mut prev = i;
            for (j, current_value) in v[i + 1..].iter().enumerate() {
                if current_value == value {
                    perm[prev] = i + 1 + j;
                    prev = i + 1 + j;
                }
            }
            perm[prev] = first;
            marked[*value] = true;
        }
        perm
    }
}
