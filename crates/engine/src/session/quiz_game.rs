//! QuizGame state machine and related types

use chrono::{DateTime, Utc};

use quizcast_domain::{scoring, Difficulty, Participant, Question, QuizId, QuizStatus};
use quizcast_protocol::{GameStateView, GameSummary, PlayerInfo};

use super::errors::QuizError;
use super::scoreboard::Scoreboard;

/// Result of an `advance_question` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Cursor moved to the next question
    Advanced,
    /// This call transitioned the game to Finished
    JustFinished,
    /// The game was already finished; nothing changed
    AlreadyFinished,
}

/// One trivia game: roster, question list, progression cursor, status, and
/// the owned scoreboard.
///
/// Pure data plus transition logic. Connections, broadcasting, and time
/// limits live in the registry and router; every mutation here happens
/// under the registry's per-game lock.
#[derive(Debug)]
pub struct QuizGame {
    id: QuizId,
    name: String,
    admin_user_id: String,
    /// Roster in join order, keyed by user id through linear search.
    /// Lobbies are small; ordering matters more than lookup speed.
    participants: Vec<Participant>,
    questions: Vec<Question>,
    current_question_index: usize,
    status: QuizStatus,
    scoreboard: Scoreboard,
    created_at: DateTime<Utc>,
}

impl QuizGame {
    /// Create a game in Waiting with the admin auto-joined as the first
    /// participant. The question list is validated and then frozen.
    pub fn new(
        name: impl Into<String>,
        admin: Participant,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        for question in &questions {
            question.validate()?;
        }

        let mut scoreboard = Scoreboard::new();
        scoreboard.add_participant(&admin);

        Ok(Self {
            id: QuizId::new(),
            name: name.into(),
            admin_user_id: admin.user_id.clone(),
            participants: vec![admin],
            questions,
            current_question_index: 0,
            status: QuizStatus::Waiting,
            scoreboard,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> QuizId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> QuizStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_user_id == user_id
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Add a participant to the roster and scoreboard.
    ///
    /// Allowed while Waiting or InProgress (late joiners spectate a running
    /// game). A duplicate id reports `AlreadyJoined` and changes nothing;
    /// existing scores and the cursor are untouched either way.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), QuizError> {
        if self.status.is_terminal() {
            return Err(QuizError::GameFinished);
        }
        if self.is_member(&participant.user_id) {
            return Err(QuizError::AlreadyJoined(participant.name));
        }
        self.scoreboard.add_participant(&participant);
        self.participants.push(participant);
        Ok(())
    }

    /// Remove a participant and their scoreboard entry. Allowed in any
    /// status; absent ids are ignored.
    pub fn remove_participant(&mut self, user_id: &str) {
        self.participants.retain(|p| p.user_id != user_id);
        self.scoreboard.remove_participant(user_id);
    }

    /// Transition Waiting -> InProgress, resetting all scores to 0 and the
    /// cursor to 0 as part of the same transition.
    pub fn start(&mut self) -> Result<(), QuizError> {
        if self.status != QuizStatus::Waiting {
            return Err(QuizError::AlreadyStarted);
        }
        if self.participants.len() < 2 || self.questions.is_empty() {
            return Err(QuizError::NotEnoughPlayersOrQuestions);
        }
        self.status = QuizStatus::InProgress;
        self.current_question_index = 0;
        self.scoreboard.reset();
        Ok(())
    }

    /// `start` gated on the admin identity.
    pub fn start_as(&mut self, user_id: &str) -> Result<(), QuizError> {
        if !self.is_admin(user_id) {
            return Err(QuizError::NotAdmin);
        }
        self.start()
    }

    /// Score one answer against the current question.
    ///
    /// Silent no-op (returns false) unless the game is in progress and the
    /// answerer is a known participant. The elapsed time is client-reported;
    /// the scoring curve caps abuse at a zero award, never below.
    pub fn submit_answer(
        &mut self,
        user_id: &str,
        answer_index: usize,
        elapsed_millis: u64,
        difficulty: Difficulty,
    ) -> bool {
        if self.status != QuizStatus::InProgress || !self.is_member(user_id) {
            return false;
        }
        let correct = match self.current_question() {
            Some(question) => question.is_correct(answer_index),
            None => return false,
        };
        let delta = scoring::answer_points(correct, elapsed_millis, difficulty);
        self.scoreboard.update_score(user_id, delta);
        true
    }

    /// Move the cursor forward, or finish the game on the last question.
    /// Safe to call again once finished: the cursor stays frozen.
    pub fn advance_question(&mut self) -> AdvanceOutcome {
        if self.status.is_terminal() {
            return AdvanceOutcome::AlreadyFinished;
        }
        if self.current_question_index + 1 < self.questions.len() {
            self.current_question_index += 1;
            AdvanceOutcome::Advanced
        } else {
            self.status = QuizStatus::Finished;
            AdvanceOutcome::JustFinished
        }
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn score(&self, user_id: &str) -> i64 {
        self.scoreboard.score(user_id)
    }

    pub fn leaderboard(&self) -> Vec<quizcast_protocol::LeaderboardEntry> {
        self.scoreboard.leaderboard()
    }

    fn players(&self) -> Vec<PlayerInfo> {
        self.participants
            .iter()
            .map(|p| PlayerInfo {
                name: p.name.clone(),
                user_id: p.user_id.clone(),
                avatar: p.avatar.clone(),
            })
            .collect()
    }

    /// The snapshot broadcast to every bound connection.
    pub fn state_view(&self) -> GameStateView {
        GameStateView {
            quiz_id: self.id.to_string(),
            quiz_name: self.name.clone(),
            status: self.status,
            players: self.players(),
            questions: self.questions.clone(),
            current_question_index: self.current_question_index,
            current_question: if self.status == QuizStatus::InProgress {
                self.current_question().cloned()
            } else {
                None
            },
            leaderboard: self.scoreboard.leaderboard(),
        }
    }

    /// Compact projection for game listings.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            quiz_id: self.id.to_string(),
            quiz_name: self.name.clone(),
            status: self.status,
            players: self.players(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str, name: &str) -> Participant {
        Participant::new(id, name, format!("{id}.png"))
    }

    fn question(id: &str, correct: usize) -> Question {
        Question::new(
            id,
            format!("question {id}"),
            vec!["a".into(), "b".into(), "c".into()],
            correct,
        )
    }

    fn two_player_game(questions: Vec<Question>) -> QuizGame {
        let mut game =
            QuizGame::new("Test Quiz", participant("admin", "Alice"), questions).expect("valid");
        game.add_participant(participant("u2", "Bob")).expect("joins");
        game
    }

    #[test]
    fn creation_auto_joins_the_admin_in_waiting() {
        let game = QuizGame::new("Quiz", participant("admin", "Alice"), vec![question("1", 0)])
            .expect("valid");

        assert_eq!(game.status(), QuizStatus::Waiting);
        assert_eq!(game.current_question_index(), 0);
        assert!(game.is_member("admin"));
        assert!(game.is_admin("admin"));
        assert_eq!(game.participants().len(), 1);
    }

    #[test]
    fn invalid_question_is_rejected_at_creation() {
        let bad = Question::new("1", "?", vec!["only".into()], 0);
        let result = QuizGame::new("Quiz", participant("admin", "Alice"), vec![bad]);
        assert!(matches!(result, Err(QuizError::InvalidQuestion(_))));
    }

    #[test]
    fn duplicate_join_reports_already_joined_and_adds_nothing() {
        let mut game = two_player_game(vec![question("1", 0)]);

        let result = game.add_participant(participant("u2", "Bob"));

        assert!(matches!(result, Err(QuizError::AlreadyJoined(_))));
        assert_eq!(game.participants().len(), 2);
    }

    #[test]
    fn start_requires_two_players_and_one_question() {
        let mut solo = QuizGame::new("Quiz", participant("admin", "Alice"), vec![question("1", 0)])
            .expect("valid");
        assert!(matches!(
            solo.start(),
            Err(QuizError::NotEnoughPlayersOrQuestions)
        ));
        assert_eq!(solo.status(), QuizStatus::Waiting);

        let mut no_questions = two_player_game(vec![]);
        assert!(matches!(
            no_questions.start(),
            Err(QuizError::NotEnoughPlayersOrQuestions)
        ));
        assert_eq!(no_questions.status(), QuizStatus::Waiting);

        // Retry succeeds once the precondition is met.
        let mut game = two_player_game(vec![question("1", 0)]);
        assert!(game.start().is_ok());
        assert_eq!(game.status(), QuizStatus::InProgress);
    }

    #[test]
    fn start_resets_scores_and_cursor() {
        let mut game = two_player_game(vec![question("1", 0), question("2", 1)]);
        game.start().expect("starts");

        assert_eq!(game.current_question_index(), 0);
        assert_eq!(game.score("admin"), 0);
        assert_eq!(game.score("u2"), 0);
    }

    #[test]
    fn start_as_rejects_non_admin() {
        let mut game = two_player_game(vec![question("1", 0)]);
        assert!(matches!(game.start_as("u2"), Err(QuizError::NotAdmin)));
        assert_eq!(game.status(), QuizStatus::Waiting);
        assert!(game.start_as("admin").is_ok());
    }

    #[test]
    fn correct_answer_awards_non_negative_incorrect_exactly_minus_100() {
        let mut game = two_player_game(vec![question("1", 1)]);
        game.start().expect("starts");

        assert!(game.submit_answer("admin", 1, 250_000, Difficulty::Hard));
        assert!(game.score("admin") >= 0);

        assert!(game.submit_answer("u2", 0, 0, Difficulty::Easy));
        assert_eq!(game.score("u2"), -100);
    }

    #[test]
    fn answers_are_ignored_outside_in_progress() {
        let mut game = two_player_game(vec![question("1", 0)]);

        assert!(!game.submit_answer("admin", 0, 0, Difficulty::Easy));
        assert_eq!(game.score("admin"), 0);

        game.start().expect("starts");
        game.advance_question();
        assert_eq!(game.status(), QuizStatus::Finished);

        assert!(!game.submit_answer("admin", 0, 0, Difficulty::Easy));
        assert_eq!(game.score("admin"), 0);
    }

    #[test]
    fn answers_from_unknown_participants_are_ignored() {
        let mut game = two_player_game(vec![question("1", 0)]);
        game.start().expect("starts");

        assert!(!game.submit_answer("stranger", 0, 0, Difficulty::Easy));
        assert_eq!(game.leaderboard().len(), 2);
    }

    #[test]
    fn n_advances_finish_exactly_once_then_no_op() {
        let mut game = two_player_game(vec![question("1", 0), question("2", 0), question("3", 0)]);
        game.start().expect("starts");

        assert_eq!(game.advance_question(), AdvanceOutcome::Advanced);
        assert_eq!(game.advance_question(), AdvanceOutcome::Advanced);
        assert_eq!(game.advance_question(), AdvanceOutcome::JustFinished);
        assert_eq!(game.status(), QuizStatus::Finished);

        let frozen = game.current_question_index();
        assert_eq!(game.advance_question(), AdvanceOutcome::AlreadyFinished);
        assert_eq!(game.current_question_index(), frozen);
    }

    #[test]
    fn late_joiners_may_spectate_but_not_after_finish() {
        let mut game = two_player_game(vec![question("1", 0)]);
        game.start().expect("starts");

        assert!(game.add_participant(participant("u3", "Cara")).is_ok());
        assert_eq!(game.current_question_index(), 0);
        assert_eq!(game.score("admin"), 0);

        game.advance_question();
        assert!(matches!(
            game.add_participant(participant("u4", "Dave")),
            Err(QuizError::GameFinished)
        ));
    }

    #[test]
    fn remove_participant_drops_roster_and_scoreboard() {
        let mut game = two_player_game(vec![question("1", 0)]);
        game.remove_participant("u2");

        assert!(!game.is_member("u2"));
        assert_eq!(game.leaderboard().len(), 1);

        // Absent ids are ignored in any status.
        game.remove_participant("u2");
        assert_eq!(game.participants().len(), 1);
    }

    #[test]
    fn state_view_exposes_current_question_only_in_progress() {
        let mut game = two_player_game(vec![question("1", 1)]);
        assert!(game.state_view().current_question.is_none());

        game.start().expect("starts");
        let view = game.state_view();
        assert_eq!(view.status, QuizStatus::InProgress);
        assert_eq!(
            view.current_question.as_ref().map(|q| q.id.as_str()),
            Some("1")
        );

        game.advance_question();
        assert!(game.state_view().current_question.is_none());
    }

    // The end-to-end scenario from the design discussion: one question with
    // correct option 1, an instant correct easy answer and a wrong answer.
    #[test]
    fn scoring_scenario_plays_out() {
        let mut game = two_player_game(vec![question("1", 1)]);
        game.start().expect("starts");

        assert!(game.submit_answer("admin", 1, 0, Difficulty::Easy));
        assert_eq!(game.score("admin"), 1000);

        assert!(game.submit_answer("u2", 0, 0, Difficulty::Easy));
        assert_eq!(game.score("u2"), -100);

        assert_eq!(game.advance_question(), AdvanceOutcome::JustFinished);

        let leaderboard = game.leaderboard();
        assert_eq!(leaderboard.len(), 2);
        assert_eq!(leaderboard[0].user_id, "admin");
        assert_eq!(leaderboard[0].score, 1000);
        assert_eq!(leaderboard[1].score, -100);
    }
}
